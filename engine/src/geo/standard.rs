//! The standard Diplomacy map: 75 provinces (34 of them supply centers) connected
//! by the classic board's borders.
//!
//! The original map builder loaded this data from CSV files shipped alongside the
//! crate. Those data files are not available in this environment, so the board is
//! instead described directly as Rust literals below and fed through the same
//! [`builder`](super::builder) pipeline used for any other map.

use super::builder::{BorderRegistry, MapError, ProvinceRegistry};
use super::{Coast, Map, Province, RegionKey, SupplyCenter, Terrain};
use crate::{Nation, UnitType};
use lazy_static::lazy_static;

lazy_static! {
    static ref STANDARD_MAP: Map = load_standard().expect("standard map data must be well-formed");
}

/// Gets a reference to the standard Diplomacy map.
pub fn standard_map() -> &'static Map {
    &STANDARD_MAP
}

/// `(short_name, full_name, supply_center)`
type ProvinceRow = (&'static str, &'static str, SupplyCenterRow);

#[derive(Clone, Copy)]
enum SupplyCenterRow {
    None,
    Neutral,
    Home(&'static str),
}

/// `(province, coast, terrain)`
type RegionRow = (&'static str, Option<Coast>, Terrain);

/// `(region1, region2, terrain)`
type BorderRow = (&'static str, &'static str, Terrain);

fn load_standard() -> Result<Map, MapError> {
    let mut provinces = ProvinceRegistry::default();
    for (short_name, full_name, sc) in PROVINCES {
        provinces.register(Province {
            short_name: (*short_name).to_string(),
            full_name: (*full_name).to_string(),
            supply_center: match sc {
                SupplyCenterRow::None => SupplyCenter::None,
                SupplyCenterRow::Neutral => SupplyCenter::Neutral,
                SupplyCenterRow::Home(nation) => SupplyCenter::Home(Nation::from(*nation)),
            },
        })?;
    }

    let mut regions = provinces.finish();
    for (province, coast, terrain) in REGIONS {
        regions.register(province, *coast, *terrain)?;
    }

    let mut borders = regions.finish();
    for (r1, r2, terrain) in BORDERS {
        borders.register(r1, r2, *terrain)?;
    }

    Ok(borders.finish())
}

use self::SupplyCenterRow::{Home, Neutral, None as NoSc};
use Coast::{East, North, South};
use Terrain::{Coast as CoastTerrain, Land, Sea};

const PROVINCES: &[ProvinceRow] = &[
    // England
    ("cly", "Clyde", NoSc),
    ("edi", "Edinburgh", Home("england")),
    ("lvp", "Liverpool", Home("england")),
    ("yor", "Yorkshire", NoSc),
    ("wal", "Wales", NoSc),
    ("lon", "London", Home("england")),
    // France
    ("bre", "Brittany", Home("france")),
    ("pic", "Picardy", NoSc),
    ("par", "Paris", Home("france")),
    ("gas", "Gascony", NoSc),
    ("bur", "Burgundy", NoSc),
    ("mar", "Marseilles", Home("france")),
    // Germany
    ("kie", "Kiel", Home("germany")),
    ("ber", "Berlin", Home("germany")),
    ("mun", "Munich", Home("germany")),
    ("ruh", "Ruhr", NoSc),
    ("sil", "Silesia", NoSc),
    ("pru", "Prussia", NoSc),
    // Italy
    ("pie", "Piedmont", NoSc),
    ("tus", "Tuscany", NoSc),
    ("ven", "Venice", Home("italy")),
    ("rom", "Rome", Home("italy")),
    ("nap", "Naples", Home("italy")),
    ("apu", "Apulia", NoSc),
    // Austria
    ("tyr", "Tyrolia", NoSc),
    ("boh", "Bohemia", NoSc),
    ("vie", "Vienna", Home("austria")),
    ("gal", "Galicia", NoSc),
    ("bud", "Budapest", Home("austria")),
    ("tri", "Trieste", Home("austria")),
    // Russia
    ("mos", "Moscow", Home("russia")),
    ("stp", "St Petersburg", Home("russia")),
    ("war", "Warsaw", Home("russia")),
    ("sev", "Sevastopol", Home("russia")),
    ("ukr", "Ukraine", NoSc),
    ("lvn", "Livonia", NoSc),
    ("fin", "Finland", NoSc),
    // Turkey
    ("con", "Constantinople", Home("turkey")),
    ("ank", "Ankara", Home("turkey")),
    ("smy", "Smyrna", Home("turkey")),
    ("arm", "Armenia", NoSc),
    ("syr", "Syria", NoSc),
    // Neutral supply centers
    ("bel", "Belgium", Neutral),
    ("hol", "Holland", Neutral),
    ("den", "Denmark", Neutral),
    ("swe", "Sweden", Neutral),
    ("nwy", "Norway", Neutral),
    ("spa", "Spain", Neutral),
    ("por", "Portugal", Neutral),
    ("tun", "Tunis", Neutral),
    ("ser", "Serbia", Neutral),
    ("rum", "Rumania", Neutral),
    ("bul", "Bulgaria", Neutral),
    ("gre", "Greece", Neutral),
    // Other non-supply-center coastal provinces
    ("naf", "North Africa", NoSc),
    ("alb", "Albania", NoSc),
    // Sea provinces
    ("nao", "North Atlantic Ocean", NoSc),
    ("nwg", "Norwegian Sea", NoSc),
    ("bar", "Barents Sea", NoSc),
    ("nth", "North Sea", NoSc),
    ("ska", "Skagerrak", NoSc),
    ("hel", "Helgoland Bight", NoSc),
    ("bal", "Baltic Sea", NoSc),
    ("bot", "Gulf of Bothnia", NoSc),
    ("eng", "English Channel", NoSc),
    ("iri", "Irish Sea", NoSc),
    ("mao", "Mid-Atlantic Ocean", NoSc),
    ("wes", "Western Mediterranean", NoSc),
    ("lyo", "Gulf of Lyon", NoSc),
    ("tys", "Tyrrhenian Sea", NoSc),
    ("ion", "Ionian Sea", NoSc),
    ("adr", "Adriatic Sea", NoSc),
    ("aeg", "Aegean Sea", NoSc),
    ("eas", "Eastern Mediterranean", NoSc),
    ("bla", "Black Sea", NoSc),
];

const REGIONS: &[RegionRow] = &[
    // Single-coast / landlocked provinces get one region each, keyed with no coast.
    ("cly", None, CoastTerrain),
    ("edi", None, CoastTerrain),
    ("lvp", None, CoastTerrain),
    ("yor", None, CoastTerrain),
    ("wal", None, CoastTerrain),
    ("lon", None, CoastTerrain),
    ("bre", None, CoastTerrain),
    ("pic", None, CoastTerrain),
    ("par", None, Land),
    ("gas", None, CoastTerrain),
    ("bur", None, Land),
    ("mar", None, CoastTerrain),
    ("kie", None, CoastTerrain),
    ("ber", None, CoastTerrain),
    ("mun", None, Land),
    ("ruh", None, Land),
    ("sil", None, Land),
    ("pru", None, CoastTerrain),
    ("pie", None, CoastTerrain),
    ("tus", None, CoastTerrain),
    ("ven", None, CoastTerrain),
    ("rom", None, CoastTerrain),
    ("nap", None, CoastTerrain),
    ("apu", None, CoastTerrain),
    ("tyr", None, Land),
    ("boh", None, Land),
    ("vie", None, Land),
    ("gal", None, Land),
    ("bud", None, Land),
    ("tri", None, CoastTerrain),
    ("mos", None, Land),
    ("war", None, Land),
    ("sev", None, CoastTerrain),
    ("ukr", None, Land),
    ("lvn", None, CoastTerrain),
    ("fin", None, CoastTerrain),
    ("con", None, CoastTerrain),
    ("ank", None, CoastTerrain),
    ("smy", None, CoastTerrain),
    ("arm", None, CoastTerrain),
    ("syr", None, CoastTerrain),
    ("bel", None, CoastTerrain),
    ("hol", None, CoastTerrain),
    ("den", None, CoastTerrain),
    ("swe", None, CoastTerrain),
    ("nwy", None, CoastTerrain),
    ("por", None, CoastTerrain),
    ("tun", None, CoastTerrain),
    ("ser", None, Land),
    ("rum", None, CoastTerrain),
    ("gre", None, CoastTerrain),
    ("naf", None, CoastTerrain),
    ("alb", None, CoastTerrain),
    // Bicoastal provinces: an army-usable coast region plus one fleet-only region
    // per named coast. The fleet-only regions are marked `Sea` so that armies
    // cannot be ordered to the specific coast and convoy pathfinding skips them.
    ("spa", None, CoastTerrain),
    ("spa", Some(North), Sea),
    ("spa", Some(South), Sea),
    ("stp", None, CoastTerrain),
    ("stp", Some(North), Sea),
    ("stp", Some(South), Sea),
    ("bul", None, CoastTerrain),
    ("bul", Some(East), Sea),
    ("bul", Some(South), Sea),
    // Sea provinces
    ("nao", None, Sea),
    ("nwg", None, Sea),
    ("bar", None, Sea),
    ("nth", None, Sea),
    ("ska", None, Sea),
    ("hel", None, Sea),
    ("bal", None, Sea),
    ("bot", None, Sea),
    ("eng", None, Sea),
    ("iri", None, Sea),
    ("mao", None, Sea),
    ("wes", None, Sea),
    ("lyo", None, Sea),
    ("tys", None, Sea),
    ("ion", None, Sea),
    ("adr", None, Sea),
    ("aeg", None, Sea),
    ("eas", None, Sea),
    ("bla", None, Sea),
];

const BORDERS: &[BorderRow] = &[
    // British Isles
    ("cly", "edi", Land),
    ("cly", "lvp", Land),
    ("cly", "nao", Sea),
    ("cly", "nwg", Sea),
    ("edi", "yor", Land),
    ("edi", "nth", Sea),
    ("edi", "nwg", Sea),
    ("edi", "lvp", Land),
    ("lvp", "yor", Land),
    ("lvp", "wal", Land),
    ("lvp", "iri", Sea),
    ("lvp", "nao", Sea),
    ("yor", "wal", Land),
    ("yor", "lon", Land),
    ("yor", "nth", Sea),
    ("wal", "lon", Land),
    ("wal", "iri", Sea),
    ("wal", "eng", Sea),
    ("lon", "nth", Sea),
    ("lon", "eng", Sea),
    // Atlantic / approach seas
    ("nao", "nwg", Sea),
    ("nao", "iri", Sea),
    ("nao", "mao", Sea),
    ("nwg", "bar", Sea),
    ("nwg", "nth", Sea),
    ("nwg", "nwy", Sea),
    ("bar", "stp(nc)", Sea),
    ("bar", "nwy", Sea),
    ("nth", "ska", Sea),
    ("nth", "den", Sea),
    ("nth", "hel", Sea),
    ("nth", "hol", Sea),
    ("nth", "bel", Sea),
    ("nth", "nwy", Sea),
    ("nth", "eng", Sea),
    ("eng", "iri", Sea),
    ("eng", "mao", Sea),
    ("eng", "bre", Sea),
    ("eng", "pic", Sea),
    ("eng", "bel", Sea),
    ("iri", "mao", Sea),
    ("mao", "bre", Sea),
    ("mao", "gas", Sea),
    ("mao", "spa(nc)", Sea),
    ("mao", "spa(sc)", Sea),
    ("mao", "por", Sea),
    ("mao", "naf", Sea),
    ("mao", "wes", Sea),
    // France
    ("bre", "pic", Land),
    ("bre", "par", Land),
    ("bre", "gas", Land),
    ("pic", "par", Land),
    ("pic", "bur", Land),
    ("pic", "bel", Land),
    ("par", "bur", Land),
    ("par", "gas", Land),
    ("bur", "gas", Land),
    ("bur", "mar", Land),
    ("bur", "bel", Land),
    ("bur", "mun", Land),
    ("bur", "ruh", Land),
    ("gas", "mar", Land),
    ("gas", "spa(nc)", Land),
    ("gas", "spa", Land),
    ("mar", "spa", Land),
    ("mar", "pie", Land),
    ("mar", "lyo", Sea),
    ("mar", "spa(sc)", Sea),
    // Low Countries / Germany
    ("bel", "hol", Land),
    ("bel", "ruh", Land),
    ("hol", "ruh", Land),
    ("hol", "kie", Land),
    ("hol", "hel", Sea),
    ("ruh", "kie", Land),
    ("ruh", "mun", Land),
    ("kie", "den", Land),
    ("kie", "ber", Land),
    ("kie", "mun", Land),
    ("kie", "hel", Sea),
    ("kie", "bal", Sea),
    ("ber", "pru", Land),
    ("ber", "sil", Land),
    ("ber", "mun", Land),
    ("ber", "bal", Sea),
    ("mun", "sil", Land),
    ("mun", "boh", Land),
    ("mun", "tyr", Land),
    ("sil", "pru", Land),
    ("sil", "war", Land),
    ("sil", "gal", Land),
    ("sil", "boh", Land),
    ("pru", "war", Land),
    ("pru", "bal", Sea),
    // Scandinavia / Baltic
    ("den", "swe", Land),
    ("den", "ska", Sea),
    ("den", "nth", Sea),
    ("den", "hel", Sea),
    ("den", "bal", Sea),
    ("swe", "nwy", Land),
    ("swe", "fin", Land),
    ("swe", "ska", Sea),
    ("swe", "bal", Sea),
    ("swe", "bot", Sea),
    ("nwy", "stp", Land),
    ("nwy", "stp(nc)", Sea),
    ("nwy", "fin", Land),
    ("nwy", "ska", Sea),
    ("nwy", "bar", Sea),
    ("ska", "hel", Sea),
    ("hel", "bal", Sea),
    ("bal", "bot", Sea),
    ("bal", "lvn", Sea),
    ("bot", "fin", Sea),
    ("bot", "stp(sc)", Sea),
    ("bot", "lvn", Sea),
    ("bot", "swe", Sea),
    ("fin", "stp", Land),
    // Russia
    ("stp", "mos", Land),
    ("stp", "lvn", Land),
    ("mos", "lvn", Land),
    ("mos", "war", Land),
    ("mos", "ukr", Land),
    ("mos", "sev", Land),
    ("war", "lvn", Land),
    ("war", "ukr", Land),
    ("war", "gal", Land),
    ("lvn", "gal", Land),
    ("ukr", "sev", Land),
    ("ukr", "rum", Land),
    ("ukr", "gal", Land),
    ("gal", "rum", Land),
    ("gal", "bud", Land),
    ("gal", "vie", Land),
    ("sev", "rum", Land),
    ("sev", "arm", Land),
    ("sev", "bla", Sea),
    // Austria / Balkans
    ("tyr", "boh", Land),
    ("tyr", "vie", Land),
    ("tyr", "tri", Land),
    ("tyr", "ven", Land),
    ("tyr", "pie", Land),
    ("boh", "vie", Land),
    ("boh", "gal", Land),
    ("vie", "gal", Land),
    ("vie", "bud", Land),
    ("vie", "tri", Land),
    ("bud", "gal", Land),
    ("bud", "rum", Land),
    ("bud", "ser", Land),
    ("bud", "tri", Land),
    ("tri", "ven", Land),
    ("tri", "ser", Land),
    ("tri", "alb", Land),
    ("tri", "adr", Sea),
    ("ser", "rum", Land),
    ("ser", "bul", Land),
    ("ser", "gre", Land),
    ("ser", "alb", Land),
    ("rum", "bul", Land),
    ("rum", "bla", Sea),
    // Italy
    ("pie", "ven", Land),
    ("pie", "tus", Land),
    ("pie", "lyo", Sea),
    ("tus", "ven", Land),
    ("tus", "rom", Land),
    ("tus", "lyo", Sea),
    ("tus", "tys", Sea),
    ("ven", "rom", Land),
    ("ven", "apu", Land),
    ("ven", "adr", Sea),
    ("rom", "nap", Land),
    ("rom", "apu", Land),
    ("rom", "tys", Sea),
    ("nap", "apu", Land),
    ("nap", "tys", Sea),
    ("nap", "ion", Sea),
    ("apu", "adr", Sea),
    ("apu", "ion", Sea),
    // Mediterranean seas / North Africa
    ("wes", "lyo", Sea),
    ("wes", "tys", Sea),
    ("wes", "naf", Sea),
    ("wes", "tun", Sea),
    ("wes", "spa(sc)", Sea),
    ("lyo", "tys", Sea),
    ("lyo", "spa(sc)", Sea),
    ("tys", "ion", Sea),
    ("tys", "tun", Sea),
    ("ion", "adr", Sea),
    ("ion", "alb", Sea),
    ("ion", "gre", Sea),
    ("ion", "tun", Sea),
    ("ion", "eas", Sea),
    ("ion", "aeg", Sea),
    ("adr", "alb", Sea),
    ("naf", "tun", Land),
    ("por", "spa", Land),
    ("por", "spa(nc)", Sea),
    ("por", "mao", Sea),
    // Eastern Mediterranean / Turkey
    ("alb", "gre", Land),
    ("gre", "bul", Land),
    ("gre", "aeg", Sea),
    ("gre", "ion", Sea),
    ("bul(ec)", "bla", Sea),
    ("bul(sc)", "aeg", Sea),
    ("bul", "con", Land),
    ("bul(ec)", "con", Sea),
    ("con", "ank", Land),
    ("con", "smy", Land),
    ("con", "bla", Sea),
    ("con", "aeg", Sea),
    ("ank", "smy", Land),
    ("ank", "arm", Land),
    ("ank", "bla", Sea),
    ("smy", "arm", Land),
    ("smy", "syr", Land),
    ("smy", "eas", Sea),
    ("smy", "aeg", Sea),
    ("arm", "syr", Land),
    ("arm", "bla", Sea),
    ("syr", "eas", Sea),
    ("bla", "rum", Sea),
    ("aeg", "eas", Sea),
];

/// `(nation, unit_type, region, coast)`
type StartingUnitRow = (&'static str, UnitType, &'static str, Option<Coast>);

const STARTING_UNITS: &[StartingUnitRow] = &[
    ("england", UnitType::Fleet, "edi", None),
    ("england", UnitType::Fleet, "lon", None),
    ("england", UnitType::Army, "lvp", None),
    ("france", UnitType::Army, "par", None),
    ("france", UnitType::Army, "mar", None),
    ("france", UnitType::Fleet, "bre", None),
    ("germany", UnitType::Army, "ber", None),
    ("germany", UnitType::Army, "mun", None),
    ("germany", UnitType::Fleet, "kie", None),
    ("italy", UnitType::Army, "rom", None),
    ("italy", UnitType::Army, "ven", None),
    ("italy", UnitType::Fleet, "nap", None),
    ("austria", UnitType::Army, "vie", None),
    ("austria", UnitType::Army, "bud", None),
    ("austria", UnitType::Fleet, "tri", None),
    ("russia", UnitType::Army, "mos", None),
    ("russia", UnitType::Army, "war", None),
    ("russia", UnitType::Fleet, "sev", None),
    ("russia", UnitType::Fleet, "stp", Some(Coast::South)),
    ("turkey", UnitType::Army, "con", None),
    ("turkey", UnitType::Army, "smy", None),
    ("turkey", UnitType::Fleet, "ank", None),
];

/// The classic starting deployment: each great power's three opening units and
/// the region (with coast, where applicable) each occupies.
pub fn standard_starting_units() -> Vec<(Nation, UnitType, RegionKey)> {
    STARTING_UNITS
        .iter()
        .map(|(nation, unit_type, province, coast)| {
            (
                Nation::from(*nation),
                *unit_type,
                RegionKey::new(*province, *coast),
            )
        })
        .collect()
}
