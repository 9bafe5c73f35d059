//! The DAIDE token dictionary: a fixed mapping between identifiers (provinces,
//! powers, order keywords, control messages) and 16-bit codes. Codes are
//! partitioned by category so the high byte alone identifies
//! what kind of token a code names, which keeps [`super::codec`] branch-free
//! for the common case.

use std::collections::HashMap;

/// High byte of a token code identifies its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Category {
    Power = 0x01,
    Province = 0x02,
    UnitType = 0x03,
    OrderKeyword = 0x04,
    ControlMessage = 0x05,
    Punctuation = 0x06,
    /// Codes in this category carry a 12-bit signed integer in their low bits
    /// rather than naming a dictionary entry.
    Integer = 0x07,
    /// Codes in this category mark the start of an inline ASCII text run, used
    /// by press messages.
    Text = 0x08,
}

/// The fixed set of power names, in the order the standard map defines them.
pub const POWERS: &[&str] = &["AUS", "ENG", "FRA", "GER", "ITA", "RUS", "TUR"];

/// The standard map's 75 provinces, ordered the same way `engine::geo::standard`
/// builds them so province codes are stable across a deployment.
pub const PROVINCES: &[&str] = &[
    "adr", "aeg", "alb", "ank", "apu", "arm", "bal", "bar", "bel", "ber", "bla", "boh", "bot",
    "bre", "bud", "bul", "bur", "cly", "con", "den", "eas", "edi", "eng", "fin", "gal", "gas",
    "gre", "hel", "hol", "ion", "iri", "kie", "lon", "lvn", "lvp", "lyo", "mao", "mar", "mos",
    "mun", "naf", "nao", "nap", "nth", "nwg", "nwy", "par", "pic", "pie", "por", "pru", "rom",
    "ruh", "rum", "ser", "sev", "sil", "ska", "smy", "spa", "stp", "swe", "syr", "tri", "tun",
    "tus", "tyr", "tys", "ukr", "ven", "vie", "wal", "war", "wes", "yor",
];

pub const UNIT_TYPES: &[&str] = &["AMY", "FLT"];

/// Order and turn-order keywords from the published DAIDE dictionary.
pub const ORDER_KEYWORDS: &[&str] = &[
    "CTO", "CVY", "HLD", "MTO", "SUP", "VIA", "DSB", "BLD", "REM", "WVE", "RTO", "YES", "NO",
];

/// Top-level control/handshake messages.
pub const CONTROL_MESSAGES: &[&str] = &[
    "IAM", "HLO", "MAP", "MDF", "SCO", "NOW", "SVE", "LOD", "HST", "ORD", "TME", "DRW", "SLO",
    "SMR", "FRM", "OUT", "PRN", "MIS", "REJ", "NOT", "YES", "ADM", "PRW", "CCD",
    // Order submission and press, added alongside `ORDER_KEYWORDS`/`PUNCTUATION`
    // so a bot can actually play a game rather than just observe one: `SUB`
    // submits a phase's orders; `SND` sends press to other powers; `FRM`
    // above doubles as the server's press relay, tagged with the original
    // sender so a recipient can tell `FRM` apart from a direct game update.
    "SUB", "SND",
];

pub const PUNCTUATION: &[&str] = &["(", ")"];

/// A code → (category, name) and name → code bidirectional table, built once
/// and shared by encoder and decoder.
pub struct Dictionary {
    forward: HashMap<(Category, String), u16>,
    backward: HashMap<u16, (Category, String)>,
}

impl Dictionary {
    pub fn standard() -> Self {
        let mut dict = Dictionary {
            forward: HashMap::new(),
            backward: HashMap::new(),
        };
        dict.load(Category::Power, POWERS);
        dict.load(Category::Province, PROVINCES);
        dict.load(Category::UnitType, UNIT_TYPES);
        dict.load(Category::OrderKeyword, ORDER_KEYWORDS);
        dict.load(Category::ControlMessage, CONTROL_MESSAGES);
        dict.load(Category::Punctuation, PUNCTUATION);
        dict
    }

    fn load(&mut self, category: Category, names: &[&str]) {
        for (i, name) in names.iter().enumerate() {
            let code = ((category as u16) << 8) | (i as u16 & 0x00ff);
            self.forward.insert((category, name.to_string()), code);
            self.backward.insert(code, (category, name.to_string()));
        }
    }

    pub fn code_of(&self, category: Category, name: &str) -> Option<u16> {
        self.forward.get(&(category, name.to_string())).copied()
    }

    pub fn name_of(&self, code: u16) -> Option<(Category, &str)> {
        self.backward
            .get(&code)
            .map(|(cat, name)| (*cat, name.as_str()))
    }

    pub fn category_of(&self, code: u16) -> Option<Category> {
        match code >> 8 {
            0x01 => Some(Category::Power),
            0x02 => Some(Category::Province),
            0x03 => Some(Category::UnitType),
            0x04 => Some(Category::OrderKeyword),
            0x05 => Some(Category::ControlMessage),
            0x06 => Some(Category::Punctuation),
            0x07 => Some(Category::Integer),
            0x08 => Some(Category::Text),
            _ => None,
        }
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_standard_province_round_trips() {
        let dict = Dictionary::standard();
        for &province in PROVINCES {
            let code = dict.code_of(Category::Province, province).unwrap();
            assert_eq!(dict.name_of(code), Some((Category::Province, province)));
        }
    }

    #[test]
    fn categories_never_collide() {
        let dict = Dictionary::standard();
        assert_eq!(
            dict.category_of(dict.code_of(Category::Power, "ENG").unwrap()),
            Some(Category::Power)
        );
        assert_eq!(
            dict.category_of(dict.code_of(Category::Province, "par").unwrap()),
            Some(Category::Province)
        );
    }
}
