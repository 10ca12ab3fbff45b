//! The editing session: one draft, its live argument bindings, section
//! visibility and debounced autosave.

use std::sync::Arc;
use std::time::Duration;

use zmna_config::editor::EditorConfig;
use zmna_types::{EditEvent, Role, ScalarField, Tense};

use crate::assembler::RecordAssembler;
use crate::autosave::Autosave;
use crate::binding::ArgumentBindingStore;
use crate::error::AssemblyError;
use crate::pattern::{ArgumentPattern, validate_raw_gloss};
use crate::preprocess::{DefaultPreprocessor, Preprocessor};
use crate::preverb::{PreverbResolution, resolve_effective_preverb, resolve_translation};
use crate::record::{VerbDraft, VerbRecord};
use crate::store::{DraftStore, StoreError};
use crate::visibility::sections::FLAG_HAS_ALTERNATIVES;
use crate::visibility::{ConfigSnapshot, ConfigUpdate, VisibilityEvaluator, VisibilityReport};

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Rejected(#[from] AssemblyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Session has no store attached")]
    Detached,
}

/// Result of applying one edit. Warnings are advisory, the edit never fails.
#[derive(Debug, Default)]
pub struct EditOutcome {
    pub visibility: VisibilityReport,
    pub warnings: Vec<String>,
}

pub struct EditorSession {
    key: Option<String>,
    draft: VerbDraft,
    bindings: ArgumentBindingStore,
    visibility: VisibilityEvaluator,
    assembler: RecordAssembler,
    preprocessor: Arc<dyn Preprocessor>,
    autosave: Option<Autosave>,
    autosave_delay: Duration,
}

impl EditorSession {
    /// Session without persistence
    pub fn new(config: &EditorConfig) -> Self {
        let mut session = Self {
            key: None,
            draft: VerbDraft::default(),
            bindings: ArgumentBindingStore::new(),
            visibility: VisibilityEvaluator::with_standard_sections(),
            assembler: RecordAssembler::new(config.optative_policy),
            preprocessor: Arc::new(DefaultPreprocessor),
            autosave: None,
            autosave_delay: Duration::from_millis(config.autosave_ms),
        };
        session.install(VerbDraft::default());
        session
    }

    pub fn with_store(mut self, store: Arc<dyn DraftStore>) -> Self {
        self.autosave = Some(Autosave::new(store, self.autosave_delay));
        self
    }

    pub fn with_preprocessor(mut self, preprocessor: Arc<dyn Preprocessor>) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Session editing an existing draft, not bound to a store key
    pub fn from_draft(config: &EditorConfig, draft: VerbDraft) -> Self {
        let mut session = Self::new(config);
        session.install(draft);
        session
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn draft(&self) -> &VerbDraft {
        &self.draft
    }

    pub fn bindings(&self) -> &ArgumentBindingStore {
        &self.bindings
    }

    pub fn visibility(&self) -> &VisibilityEvaluator {
        &self.visibility
    }

    pub fn pattern(&self) -> Option<ArgumentPattern> {
        ArgumentPattern::parse(&self.draft.pattern).ok()
    }

    pub fn assemble(&self) -> Result<VerbRecord, AssemblyError> {
        self.assembler.assemble(&self.draft)
    }

    pub fn resolve_preverb(&self, requested: &str, tense: Tense) -> PreverbResolution {
        resolve_effective_preverb(
            requested,
            tense,
            &self.draft.preverb_config,
            &self.draft.preverb_rules,
        )
    }

    pub fn translation(&self, preverb: &str, tense: Tense) -> String {
        resolve_translation(
            preverb,
            tense,
            &self.draft.preverb_config,
            &self.draft.preverb_rules,
            &self.draft.default_translations(),
            &self.draft.scalars.description,
        )
    }

    /// Switch to the record stored under `key`, or start a fresh draft for
    /// it. Any pending autosave of the previous record is cancelled first.
    /// Returns whether a stored draft was found.
    pub async fn load(&mut self, key: &str) -> Result<bool, StoreError> {
        let key = self.preprocessor.process(key);
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key));
        }

        let stored = match self.autosave.as_mut() {
            Some(autosave) => {
                autosave.cancel().await;
                autosave.store().load(&key).await?
            }
            None => None,
        };

        let found = stored.is_some();
        let draft = stored.unwrap_or_else(|| {
            let mut draft = VerbDraft::default();
            draft.scalars.georgian_wrapper = key.clone();
            draft
        });

        tracing::info!("Editing {key} ({})", if found { "restored" } else { "new" });
        self.install(draft);
        self.key = Some(key);
        Ok(found)
    }

    /// Drop the current record and its stored progress
    pub async fn clear(&mut self) -> Result<(), StoreError> {
        if let Some(autosave) = self.autosave.as_mut() {
            autosave.cancel().await;
            if let Some(key) = &self.key {
                autosave.store().clear(key).await?;
            }
        }

        tracing::info!("Cleared form");
        self.key = None;
        self.install(VerbDraft::default());
        Ok(())
    }

    /// Persist the current draft now
    pub async fn flush(&mut self) -> Result<(), StoreError> {
        match (self.autosave.as_mut(), &self.key) {
            (Some(autosave), Some(key)) => autosave.flush(key, &self.draft).await,
            _ => Ok(()),
        }
    }

    /// Persist the draft, then assemble and publish the record. A rejected
    /// draft is still saved so no progress is lost.
    pub async fn save(&mut self) -> Result<VerbRecord, SaveError> {
        self.flush().await?;
        let record = self.assemble()?;

        match &self.autosave {
            Some(autosave) => autosave.store().publish(&record).await?,
            None => return Err(SaveError::Detached),
        }

        Ok(record)
    }

    /// Apply one edit, refresh visibility and schedule an autosave.
    pub fn apply(&mut self, event: EditEvent) -> EditOutcome {
        let mut warnings = Vec::new();
        let update = self.mutate(event, &mut warnings);

        let visibility = self.visibility.update_state(update);
        warnings.extend(visibility.faults.iter().map(|f| f.to_string()));

        for warning in &warnings {
            tracing::debug!("Edit warning: {warning}");
        }

        if let (Some(autosave), Some(key)) = (self.autosave.as_mut(), &self.key) {
            autosave.schedule(key, self.draft.clone());
        }

        EditOutcome {
            visibility,
            warnings,
        }
    }

    fn mutate(&mut self, event: EditEvent, warnings: &mut Vec<String>) -> ConfigUpdate {
        let update = ConfigUpdate::new();

        match event {
            EditEvent::SetScalar { field, value } => {
                let value = self.preprocessor.process(&value);
                let scalars = &mut self.draft.scalars;
                match field {
                    ScalarField::Wrapper => {
                        let has_wrapper = !value.is_empty();
                        scalars.georgian_wrapper = value;
                        return update.has_wrapper(has_wrapper);
                    }
                    ScalarField::Display => scalars.georgian_display = value,
                    ScalarField::Description => scalars.description = value,
                    ScalarField::SemanticKey => scalars.semantic_key = value,
                }
                update
            }
            EditEvent::SetPattern { pattern } => {
                self.draft.pattern = pattern.trim().to_string();
                match ArgumentPattern::parse(&self.draft.pattern) {
                    Ok(parsed) => {
                        self.reconfigure(parsed);
                        warnings.extend(self.gloss_warnings(None));
                        update.pattern(Some(parsed))
                    }
                    Err(e) => {
                        warnings.push(e.to_string());
                        update.pattern(None)
                    }
                }
            }
            EditEvent::SetAlternatives { patterns } => {
                self.draft.alternatives = patterns
                    .iter()
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect();
                for text in &self.draft.alternatives {
                    if let Err(e) = ArgumentPattern::parse(text) {
                        warnings.push(e.to_string());
                    }
                }
                let has_alternatives = !self.draft.alternatives.is_empty();
                self.draft
                    .flags
                    .insert(FLAG_HAS_ALTERNATIVES.to_string(), has_alternatives);
                update.flag(FLAG_HAS_ALTERNATIVES, has_alternatives)
            }
            EditEvent::SetPreposition { role, value } => {
                let value = self.preprocessor.process(&value);
                self.draft.scalars.prepositions.set(role, value);
                update
            }
            EditEvent::SetBinding {
                role,
                person,
                field,
                value,
            } => {
                if self.pattern().is_none() {
                    warnings.push("Choose an argument pattern before filling arguments".to_string());
                } else if self
                    .bindings
                    .set(role, person, field, &self.preprocessor.process(&value))
                {
                    self.draft.bindings = self.bindings.snapshot();
                } else {
                    warnings.push(format!("{role} {person} is not an active argument slot, edit ignored"));
                }
                update
            }
            EditEvent::SetHasMultiplePreverbs { enabled } => {
                let config = &mut self.draft.preverb_config;
                config.set_has_multiple(enabled);
                if enabled && !config.default_preverb.is_empty() {
                    let default = config.default_preverb.clone();
                    config.add_preverb(&default);
                }
                update
                    .has_multiple_preverbs(enabled)
                    .available_preverbs(config.available_preverbs.clone())
            }
            EditEvent::AddPreverb { preverb } => {
                let preverb = self.preprocessor.process(&preverb);
                let config = &mut self.draft.preverb_config;
                if !config.has_multiple {
                    warnings.push(format!(
                        "Enable multiple preverbs before adding {preverb:?}, edit ignored"
                    ));
                    return update;
                }
                if !config.add_preverb(&preverb) {
                    warnings.push(format!("Preverb {preverb:?} is blank or already listed"));
                } else if config.default_preverb.is_empty() {
                    config.default_preverb = preverb;
                }
                update
                    .available_preverbs(config.available_preverbs.clone())
                    .default_preverb(config.default_preverb.clone())
            }
            EditEvent::RemovePreverb { preverb } => {
                let preverb = self.preprocessor.process(&preverb);
                let config = &mut self.draft.preverb_config;
                if config.remove_preverb(&preverb) && config.default_preverb == preverb {
                    warnings.push(format!(
                        "Removed the default preverb {preverb:?}, choose a new default"
                    ));
                }
                // rules for the removed preverb are kept, just no longer read
                update.available_preverbs(config.available_preverbs.clone())
            }
            EditEvent::SetDefaultPreverb { preverb } => {
                let preverb = self.preprocessor.process(&preverb);
                let config = &mut self.draft.preverb_config;
                if config.has_multiple && !config.is_available(&preverb) {
                    warnings.push(format!("Default preverb {preverb:?} is not in the available list"));
                }
                config.default_preverb = preverb;
                update.default_preverb(config.default_preverb.clone())
            }
            EditEvent::SetTenseFallback {
                preverb,
                tenses,
                fallback,
            } => {
                let preverb = self.preprocessor.process(&preverb);
                let fallback = self.preprocessor.process(&fallback);
                self.warn_unconfigured(&preverb, warnings);
                if !fallback.is_empty() {
                    self.warn_unconfigured(&fallback, warnings);
                }
                self.draft
                    .preverb_rules
                    .set_fallback(&preverb, &tenses, &fallback);
                update
            }
            EditEvent::ClearTenseFallback { preverb, tense } => {
                let preverb = self.preprocessor.process(&preverb);
                self.draft.preverb_rules.clear_fallback(&preverb, tense);
                update
            }
            EditEvent::SetPreverbTranslation {
                preverb,
                tense,
                text,
            } => {
                let preverb = self.preprocessor.process(&preverb);
                self.warn_unconfigured(&preverb, warnings);
                self.draft
                    .preverb_rules
                    .set_translation(&preverb, tense, text.trim());
                update
            }
            EditEvent::SetArgumentOverride {
                preverb,
                role,
                person,
                field,
                value,
            } => {
                let preverb = self.preprocessor.process(&preverb);
                self.warn_unconfigured(&preverb, warnings);
                self.warn_inactive_role(role, warnings);
                let value = self.preprocessor.process(&value);
                self.draft
                    .preverb_rules
                    .set_override(&preverb, role, person, field, &value);
                update
            }
            EditEvent::SetTranslation { tense, text } => {
                self.draft.tense_mut(tense).translation = text.trim().to_string();
                update
            }
            EditEvent::SetRawGloss { tense, gloss } => {
                self.draft.tense_mut(tense).raw_gloss = gloss.trim().to_string();
                warnings.extend(self.gloss_warnings(Some(tense)));
                update
            }
            EditEvent::SetForm {
                tense,
                person,
                form,
            } => {
                if !tense.persons().contains(&person) {
                    warnings.push(format!("The {tense} has no {person} form, edit ignored"));
                    return update;
                }
                let form = self.preprocessor.process(&form);
                let forms = &mut self.draft.tense_mut(tense).forms;
                if form.is_empty() {
                    forms.remove(&person);
                } else {
                    forms.insert(person, form);
                }
                update
            }
            EditEvent::SetFlag { name, value } => {
                self.draft.flags.insert(name.clone(), value);
                update.flag(name, value)
            }
        }
    }

    /// Two-phase pattern change: reconfigure roles, then restore whatever
    /// bindings still fit. The draft keeps its bindings while the pattern
    /// text is invalid, so they come back once it parses again.
    fn reconfigure(&mut self, pattern: ArgumentPattern) {
        let captured = self.draft.bindings.clone();
        self.bindings.reconfigure_pattern(pattern);
        self.bindings.restore_bindings(&captured);
        self.draft.bindings = self.bindings.snapshot();
    }

    fn gloss_warnings(&self, only: Option<Tense>) -> Vec<String> {
        let Some(pattern) = self.pattern() else {
            return Vec::new();
        };

        self.draft
            .tenses
            .iter()
            .filter(|(tense, entry)| only.is_none_or(|t| t == **tense) && !entry.raw_gloss.is_empty())
            .filter_map(|(tense, entry)| {
                validate_raw_gloss(&entry.raw_gloss, pattern)
                    .err()
                    .map(|e| format!("{tense}: {e}"))
            })
            .collect()
    }

    fn warn_unconfigured(&self, preverb: &str, warnings: &mut Vec<String>) {
        if !self.draft.preverb_config.is_available(preverb) {
            warnings.push(format!(
                "Preverb {preverb:?} is not configured, the entry is stored but inactive"
            ));
        }
    }

    fn warn_inactive_role(&self, role: Role, warnings: &mut Vec<String>) {
        if !self.bindings.is_role_active(role) {
            warnings.push(format!("Role {role} is not part of the current pattern"));
        }
    }

    /// Replace the draft and rebuild everything derived from it
    fn install(&mut self, draft: VerbDraft) {
        self.draft = draft;
        self.bindings.reset();
        if let Some(pattern) = self.pattern() {
            self.reconfigure(pattern);
        }

        let state = ConfigSnapshot {
            pattern: self.pattern(),
            has_multiple_preverbs: self.draft.preverb_config.has_multiple,
            default_preverb: self.draft.preverb_config.default_preverb.clone(),
            available_preverbs: self.draft.preverb_config.available_preverbs.clone(),
            has_wrapper: !self.draft.scalars.georgian_wrapper.trim().is_empty(),
            flags: self.draft.flags.clone(),
        };
        let report = self.visibility.reset_state(state);
        for fault in &report.faults {
            tracing::warn!("{fault}");
        }
    }
}

#[cfg(test)]
mod tests {
    use zmna_types::{BindingField, Person};

    use super::*;
    use crate::store::MemoryStore;
    use crate::visibility::sections;

    fn config() -> EditorConfig {
        EditorConfig {
            autosave_ms: 20,
            ..EditorConfig::default()
        }
    }

    fn binding(role: Role, person: Person, value: &str) -> EditEvent {
        EditEvent::SetBinding {
            role,
            person,
            field: BindingField::Noun,
            value: value.to_string(),
        }
    }

    fn pattern(text: &str) -> EditEvent {
        EditEvent::SetPattern {
            pattern: text.to_string(),
        }
    }

    #[test]
    fn pattern_change_keeps_surviving_bindings() {
        let mut session = EditorSession::new(&config());
        session.apply(pattern("<S-DO>"));
        session.apply(binding(Role::Subject, Person::Third, "კაცი"));
        session.apply(binding(Role::DirectObject, Person::First, "წიგნი"));

        let outcome = session.apply(pattern("<S-IO>"));
        assert!(
            outcome
                .visibility
                .transitions
                .iter()
                .any(|t| t.section == sections::INDIRECT_OBJECT_ARGUMENTS && t.visible)
        );

        let store = session.bindings();
        assert_eq!(store.get(Role::Subject, Person::Third).noun.as_deref(), Some("კაცი"));
        assert!(!store.is_role_active(Role::DirectObject));
        assert!(store.get(Role::IndirectObject, Person::First).is_empty());
        assert!(!session.visibility().is_visible(sections::DIRECT_OBJECT_ARGUMENTS));
    }

    #[test]
    fn invalid_pattern_text_keeps_draft_bindings() {
        let mut session = EditorSession::new(&config());
        session.apply(pattern("<S-DO>"));
        session.apply(binding(Role::DirectObject, Person::Second, "ხე"));

        let outcome = session.apply(pattern("<S-D"));
        assert!(!outcome.warnings.is_empty());
        assert!(!session.visibility().is_visible(sections::SUBJECT_ARGUMENTS));

        session.apply(pattern("<S-DO>"));
        assert_eq!(
            session
                .bindings()
                .get(Role::DirectObject, Person::Second)
                .noun
                .as_deref(),
            Some("ხე")
        );
    }

    #[test]
    fn binding_without_pattern_is_ignored() {
        let mut session = EditorSession::new(&config());
        let outcome = session.apply(binding(Role::Subject, Person::Third, "კაცი"));

        assert_eq!(outcome.warnings.len(), 1);
        assert!(session.draft().bindings.is_empty());
    }

    #[test]
    fn enabling_multiple_preverbs_lists_the_default() {
        let mut session = EditorSession::new(&config());
        session.apply(EditEvent::SetDefaultPreverb {
            preverb: "და".to_string(),
        });
        session.apply(EditEvent::SetHasMultiplePreverbs { enabled: true });

        let config = &session.draft().preverb_config;
        assert_eq!(config.available_preverbs, vec!["და".to_string()]);
        assert!(session.visibility().is_visible(sections::PREVERB_SELECTION));
        assert!(!session.visibility().is_visible(sections::PREVERB_FALLBACKS));

        session.apply(EditEvent::AddPreverb {
            preverb: "გა".to_string(),
        });
        assert!(session.visibility().is_visible(sections::PREVERB_FALLBACKS));
    }

    #[test]
    fn rules_for_unlisted_preverbs_warn_but_are_stored() {
        let mut session = EditorSession::new(&config());
        let outcome = session.apply(EditEvent::SetPreverbTranslation {
            preverb: "მი".to_string(),
            tense: Tense::Present,
            text: "takes away".to_string(),
        });

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(
            session.draft().preverb_rules.translation("მი", Tense::Present),
            Some("takes away")
        );
    }

    #[test]
    fn gloss_edits_warn_on_mismatch() {
        let mut session = EditorSession::new(&config());
        session.apply(pattern("<S-DO>"));

        let ok = session.apply(EditEvent::SetRawGloss {
            tense: Tense::Present,
            gloss: "V MedAct Pres <S:Nom> <DO:Dat>".to_string(),
        });
        assert!(ok.warnings.is_empty());

        let bad = session.apply(EditEvent::SetRawGloss {
            tense: Tense::Aorist,
            gloss: "V MedAct Aor <S:Erg>".to_string(),
        });
        assert_eq!(bad.warnings.len(), 1);
        assert!(bad.warnings[0].starts_with("aorist"));
    }

    #[test]
    fn forms_for_illegal_persons_are_rejected() {
        let mut session = EditorSession::new(&config());
        let outcome = session.apply(EditEvent::SetForm {
            tense: Tense::Imperative,
            person: Person::First,
            form: "ვწერო".to_string(),
        });

        assert_eq!(outcome.warnings.len(), 1);
        assert!(session.draft().tense(Tense::Imperative).is_none());
    }

    #[test]
    fn wrapper_drives_example_section() {
        let mut session = EditorSession::new(&config());
        session.apply(pattern("<S>"));
        assert!(!session.visibility().is_visible(sections::EXAMPLE_GENERATION));

        session.apply(EditEvent::SetScalar {
            field: ScalarField::Wrapper,
            value: " წერა ".to_string(),
        });
        assert_eq!(session.draft().scalars.georgian_wrapper, "წერა");
        assert!(session.visibility().is_visible(sections::EXAMPLE_GENERATION));
    }

    #[tokio::test]
    async fn edits_are_autosaved_after_the_burst() {
        let store = Arc::new(MemoryStore::new());
        let mut session = EditorSession::new(&config()).with_store(store.clone());

        assert!(!session.load("წერა").await.unwrap());
        assert_eq!(session.draft().scalars.georgian_wrapper, "წერა");

        session.apply(pattern("<S-DO>"));
        session.apply(binding(Role::Subject, Person::Third, "კაცი"));
        session.apply(binding(Role::Subject, Person::ThirdPlural, "კაცები"));

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(store.save_count(), 1);

        let saved = store.load("წერა").await.unwrap().unwrap();
        assert_eq!(saved.pattern, "<S-DO>");
        assert_eq!(saved, *session.draft());
    }

    #[tokio::test]
    async fn switching_records_never_writes_the_old_draft_under_the_new_key() {
        let store = Arc::new(MemoryStore::new());
        let mut session = EditorSession::new(&config()).with_store(store.clone());

        session.load("წერა").await.unwrap();
        session.apply(pattern("<S-DO>"));
        session.load("ხატვა").await.unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(store.save_count(), 0);
        assert_eq!(session.draft().pattern, "");
        assert_eq!(session.key(), Some("ხატვა"));
    }

    #[tokio::test]
    async fn load_restores_visibility_and_bindings() {
        let store = Arc::new(MemoryStore::new());
        let mut session = EditorSession::new(&config()).with_store(store.clone());

        session.load("წერა").await.unwrap();
        session.apply(pattern("<S-IO>"));
        session.apply(binding(Role::IndirectObject, Person::Second, "მეგობარი"));
        session.flush().await.unwrap();

        let mut other = EditorSession::new(&config()).with_store(store.clone());
        assert!(other.load("წერა").await.unwrap());
        assert!(other.visibility().is_visible(sections::INDIRECT_OBJECT_ARGUMENTS));
        assert_eq!(
            other
                .bindings()
                .get(Role::IndirectObject, Person::Second)
                .noun
                .as_deref(),
            Some("მეგობარი")
        );
    }

    #[tokio::test]
    async fn save_publishes_only_valid_records() {
        let store = Arc::new(MemoryStore::new());
        let mut session = EditorSession::new(&config()).with_store(store.clone());
        session.load("წერა").await.unwrap();

        let rejected = session.save().await.unwrap_err();
        assert!(matches!(rejected, SaveError::Rejected(_)));
        assert_eq!(store.save_count(), 1);
        assert!(store.record("წერა").await.is_none());

        session.apply(pattern("<S-DO>"));
        let record = session.save().await.unwrap();
        assert_eq!(record.global_argument_pattern, ArgumentPattern::SubjectDirectObject);
        assert_eq!(store.record("წერა").await, Some(record));
    }

    #[tokio::test]
    async fn save_without_store_is_detached() {
        let mut session = EditorSession::new(&config());
        session.apply(EditEvent::SetScalar {
            field: ScalarField::Wrapper,
            value: "წერა".to_string(),
        });
        session.apply(pattern("<S>"));

        assert!(matches!(session.save().await, Err(SaveError::Detached)));
    }

    #[tokio::test]
    async fn clear_discards_stored_progress() {
        let store = Arc::new(MemoryStore::new());
        let mut session = EditorSession::new(&config()).with_store(store.clone());

        session.load("წერა").await.unwrap();
        session.flush().await.unwrap();
        session.clear().await.unwrap();

        assert!(store.load("წერა").await.unwrap().is_none());
        assert_eq!(session.key(), None);
        assert_eq!(*session.draft(), VerbDraft::default());
    }
}
