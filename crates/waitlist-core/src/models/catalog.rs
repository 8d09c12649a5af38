//! Clinic service catalog: treatment specialties and scheduling shifts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A label that did not match any known catalog entry.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Treatment specialties offered by the rehabilitation centre.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Specialty {
    #[serde(rename = "Fisioterapia Traumato-Ortopédica")]
    OrthopedicPhysiotherapy,
    #[serde(rename = "Fisioterapia Neurofuncional")]
    NeurofunctionalPhysiotherapy,
    #[serde(rename = "Fisioterapia Uroginecológica")]
    UrogynecologicalPhysiotherapy,
    #[serde(rename = "Reeducação Postural Global")]
    GlobalPosturalReeducation,
    #[serde(rename = "Disfunção Temporomandibular")]
    TemporomandibularDysfunction,
    #[serde(rename = "Acupuntura")]
    Acupuncture,
    #[serde(rename = "Fonoaudiologia")]
    SpeechTherapy,
    #[serde(rename = "Psicologia")]
    Psychology,
    #[serde(rename = "Terapia Ocupacional")]
    OccupationalTherapy,
}

impl Specialty {
    /// Every specialty, in the order the intake form lists them.
    pub const ALL: [Specialty; 9] = [
        Specialty::OrthopedicPhysiotherapy,
        Specialty::NeurofunctionalPhysiotherapy,
        Specialty::UrogynecologicalPhysiotherapy,
        Specialty::GlobalPosturalReeducation,
        Specialty::TemporomandibularDysfunction,
        Specialty::Acupuncture,
        Specialty::SpeechTherapy,
        Specialty::Psychology,
        Specialty::OccupationalTherapy,
    ];

    /// Label as written to the waitlist files.
    pub fn label(&self) -> &'static str {
        match self {
            Specialty::OrthopedicPhysiotherapy => "Fisioterapia Traumato-Ortopédica",
            Specialty::NeurofunctionalPhysiotherapy => "Fisioterapia Neurofuncional",
            Specialty::UrogynecologicalPhysiotherapy => "Fisioterapia Uroginecológica",
            Specialty::GlobalPosturalReeducation => "Reeducação Postural Global",
            Specialty::TemporomandibularDysfunction => "Disfunção Temporomandibular",
            Specialty::Acupuncture => "Acupuntura",
            Specialty::SpeechTherapy => "Fonoaudiologia",
            Specialty::Psychology => "Psicologia",
            Specialty::OccupationalTherapy => "Terapia Ocupacional",
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Specialty {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Specialty::ALL
            .iter()
            .copied()
            .find(|sp| sp.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLabel {
                kind: "specialty",
                value: s.to_string(),
            })
    }
}

/// Preferred shift for treatment sessions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeSlot {
    #[serde(rename = "Manhã")]
    Morning,
    #[serde(rename = "Tarde")]
    Afternoon,
    #[default]
    #[serde(rename = "Indiferente")]
    NoPreference,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::NoPreference];

    /// Label as written to the waitlist files.
    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "Manhã",
            TimeSlot::Afternoon => "Tarde",
            TimeSlot::NoPreference => "Indiferente",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TimeSlot::ALL
            .iter()
            .copied()
            .find(|slot| slot.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLabel {
                kind: "time slot",
                value: s.to_string(),
            })
    }
}
