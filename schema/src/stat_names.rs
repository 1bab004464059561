use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Base stats that can be filtered on, named as the API names them.
///
/// Declaration order is the canonical order used whenever stats are
/// serialized into a query.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum StatName {
    Hp,
    Attack,
    Defense,
    #[strum(to_string = "special-attack", serialize = "spatk", serialize = "sp-atk")]
    SpecialAttack,
    #[strum(to_string = "special-defense", serialize = "spdef", serialize = "sp-def")]
    SpecialDefense,
    Speed,
}

impl StatName {
    /// Short human-readable label, e.g. "Sp. Atk".
    pub fn label(self) -> &'static str {
        match self {
            StatName::Hp => "HP",
            StatName::Attack => "Attack",
            StatName::Defense => "Defense",
            StatName::SpecialAttack => "Sp. Atk",
            StatName::SpecialDefense => "Sp. Def",
            StatName::Speed => "Speed",
        }
    }
}
