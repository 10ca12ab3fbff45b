use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic role a verb argument can fill.
///
/// Declaration order is the canonical order: Subject, DirectObject,
/// IndirectObject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Subject,
    DirectObject,
    IndirectObject,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Subject, Role::DirectObject, Role::IndirectObject];

    /// Role code used inside argument patterns and raw glosses
    pub fn code(&self) -> &'static str {
        match self {
            Role::Subject => "S",
            Role::DirectObject => "DO",
            Role::IndirectObject => "IO",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Role::Subject),
            "DO" => Some(Role::DirectObject),
            "IO" => Some(Role::IndirectObject),
            _ => None,
        }
    }

    /// Record key (`subject`, `direct_object`, `indirect_object`)
    pub fn key(&self) -> &'static str {
        match self {
            Role::Subject => "subject",
            Role::DirectObject => "direct_object",
            Role::IndirectObject => "indirect_object",
        }
    }

    /// Persons this role can bind. Subjects only take third person.
    pub fn persons(&self) -> &'static [Person] {
        match self {
            Role::Subject => &[Person::Third, Person::ThirdPlural],
            Role::DirectObject | Role::IndirectObject => &Person::ALL,
        }
    }

    pub fn binds(&self, person: Person) -> bool {
        self.persons().contains(&person)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Grammatical person and number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Person {
    #[serde(rename = "1sg")]
    First,
    #[serde(rename = "2sg")]
    Second,
    #[serde(rename = "3sg")]
    Third,
    #[serde(rename = "1pl")]
    FirstPlural,
    #[serde(rename = "2pl")]
    SecondPlural,
    #[serde(rename = "3pl")]
    ThirdPlural,
}

impl Person {
    pub const ALL: [Person; 6] = [
        Person::First,
        Person::Second,
        Person::Third,
        Person::FirstPlural,
        Person::SecondPlural,
        Person::ThirdPlural,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Person::First => "1sg",
            Person::Second => "2sg",
            Person::Third => "3sg",
            Person::FirstPlural => "1pl",
            Person::SecondPlural => "2pl",
            Person::ThirdPlural => "3pl",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Person::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tense {
    Present,
    Imperfect,
    Future,
    Aorist,
    Optative,
    Imperative,
}

impl Tense {
    pub const ALL: [Tense; 6] = [
        Tense::Present,
        Tense::Imperfect,
        Tense::Future,
        Tense::Aorist,
        Tense::Optative,
        Tense::Imperative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tense::Present => "present",
            Tense::Imperfect => "imperfect",
            Tense::Future => "future",
            Tense::Aorist => "aorist",
            Tense::Optative => "optative",
            Tense::Imperative => "imperative",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Tense::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Persons that carry a form in this tense.
    /// The imperative only has second person forms.
    pub fn persons(&self) -> &'static [Person] {
        match self {
            Tense::Imperative => &[Person::Second, Person::SecondPlural],
            _ => &Person::ALL,
        }
    }

    /// Persons a role can bind in this tense
    pub fn persons_for(&self, role: Role) -> Vec<Person> {
        match self {
            Tense::Imperative => self.persons().to_vec(),
            _ => role.persons().to_vec(),
        }
    }
}

impl fmt::Display for Tense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which half of an argument binding an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingField {
    /// Lexical item
    Noun,
    /// Modifier
    Adjective,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_binds_only_third_person() {
        assert_eq!(Role::Subject.persons(), &[Person::Third, Person::ThirdPlural]);
        assert!(!Role::Subject.binds(Person::First));
        assert!(Role::IndirectObject.binds(Person::First));
    }

    #[test]
    fn imperative_overrides_role_persons() {
        assert_eq!(
            Tense::Imperative.persons_for(Role::Subject),
            vec![Person::Second, Person::SecondPlural]
        );
        assert_eq!(Tense::Aorist.persons_for(Role::DirectObject).len(), 6);
    }

    #[test]
    fn serde_uses_record_keys() {
        assert_eq!(serde_json::to_string(&Person::ThirdPlural).unwrap(), "\"3pl\"");
        assert_eq!(serde_json::to_string(&Role::DirectObject).unwrap(), "\"direct_object\"");
        assert_eq!(serde_json::to_string(&Tense::Aorist).unwrap(), "\"aorist\"");
        assert_eq!(Person::parse("2pl"), Some(Person::SecondPlural));
        assert_eq!(Tense::parse("optative"), Some(Tense::Optative));
        assert_eq!(Role::from_code("DO"), Some(Role::DirectObject));
    }
}
