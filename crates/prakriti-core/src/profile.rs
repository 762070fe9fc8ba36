//! Reference descriptions of the three base doshas.
//!
//! Shown alongside a report for every dosha that is dominant.

use crate::model::Dosha;

/// Static description of one base dosha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoshaProfile {
    pub dosha: Dosha,
    pub title: &'static str,
    /// The two elements the dosha combines.
    pub elements: &'static str,
    pub summary: &'static str,
    /// Gunas as `(sanskrit, english)`.
    pub qualities: &'static [(&'static str, &'static str)],
    /// Typical imbalances as `(sanskrit, english)`.
    pub imbalances: &'static [(&'static str, &'static str)],
}

const PROFILES: [DoshaProfile; 3] = [
    DoshaProfile {
        dosha: Dosha::Vata,
        title: "The Vata Tattva",
        elements: "Ether & Air",
        summary: "Vata is the primary moving force.",
        qualities: &[
            ("Laghu", "Light"),
            ("Shita", "Cold"),
            ("Ruksha", "Dry"),
            ("Khara", "Rough"),
        ],
        imbalances: &[("Chinta", "Anxiety"), ("Nidranasha", "Insomnia")],
    },
    DoshaProfile {
        dosha: Dosha::Pitta,
        title: "The Pitta Tattva",
        elements: "Fire & Water",
        summary: "Pitta governs metabolism.",
        qualities: &[("Usna", "Hot"), ("Tikshna", "Sharp"), ("Laghu", "Light")],
        imbalances: &[("Krodha", "Anger"), ("Amlapitta", "Acidity")],
    },
    DoshaProfile {
        dosha: Dosha::Kapha,
        title: "The Kapha Tattva",
        elements: "Earth & Water",
        summary: "Kapha provides structure.",
        qualities: &[("Guru", "Heavy"), ("Shita", "Cold"), ("Snigdha", "Oily")],
        imbalances: &[("Alasya", "Lethargy"), ("Sthoulya", "Weight Gain")],
    },
];

/// Profile of a base dosha; composite tags have none.
pub fn profile(dosha: Dosha) -> Option<&'static DoshaProfile> {
    PROFILES.iter().find(|p| p.dosha == dosha)
}

impl DoshaProfile {
    /// "Laghu (Light), Shita (Cold)" style listing.
    pub fn describe(pairs: &[(&str, &str)]) -> String {
        pairs
            .iter()
            .map(|(sanskrit, english)| format!("{sanskrit} ({english})"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_base_dosha_has_a_profile() {
        for d in Dosha::BASE {
            assert_eq!(profile(d).unwrap().dosha, d);
        }
        assert!(profile(Dosha::Tridosha).is_none());
    }

    #[test]
    fn describe_pairs() {
        let kapha = profile(Dosha::Kapha).unwrap();
        assert_eq!(
            DoshaProfile::describe(kapha.qualities),
            "Guru (Heavy), Shita (Cold), Snigdha (Oily)"
        );
    }
}
