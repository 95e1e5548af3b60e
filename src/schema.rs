use std::{collections::BTreeMap, convert::Infallible, str::FromStr};

use chrono::{DateTime, Utc};
use derive_more::{AsRef, Display, From};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use typed_builder::TypedBuilder;
use url::Url;

use crate::config::Settings;

/// One game as listed on the explore page.
#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Getters, CopyGetters, Serialize, Deserialize)]
pub struct GameRecord {
    #[getset(get = "pub")]
    name: GameTitle,
    #[getset(get = "pub")]
    identifier: AppId,
    #[getset(get = "pub")]
    rating: Tier,
    #[getset(get_copy = "pub")]
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<ReportCount>,
    #[getset(get = "pub")]
    #[builder(default)]
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}
impl GameRecord {
    /// Number of fields carrying information besides the identifier.
    pub fn populated_fields(&self) -> usize {
        let name: &str = self.name.as_ref();
        [
            !name.is_empty(),
            !self.rating.is_blank(),
            self.score.is_some(),
        ]
        .into_iter()
        .filter(|&populated| populated)
        .count()
            + self.metadata.values().filter(|v| !v.is_empty()).count()
    }
}

#[derive(Clone, PartialEq, Eq, Debug, From, AsRef, Display, Serialize, Deserialize)]
#[as_ref(forward)]
pub struct GameTitle(String);

/// Steam app id.  Never empty.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, AsRef, Display, Serialize, Deserialize)]
#[as_ref(forward)]
#[serde(try_from = "String")]
pub struct AppId(String);

#[derive(PartialEq, Eq, Debug, Error)]
#[error("App id must not be empty")]
pub struct EmptyAppId;

impl TryFrom<String> for AppId {
    type Error = EmptyAppId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err(EmptyAppId);
        }
        Ok(Self(value.to_owned()))
    }
}
impl AppId {
    pub fn protondb_link(&self) -> String {
        format!("https://www.protondb.com/app/{}", self.0)
    }

    pub fn steam_link(&self) -> String {
        format!("https://store.steampowered.com/app/{}", self.0)
    }
}

/// Number of reports the rating is based on.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, From, Display, Serialize, Deserialize)]
pub struct ReportCount(u32);
impl ReportCount {
    pub fn get(self) -> u32 {
        self.0
    }
}

/// ProtonDB compatibility tier.
///
/// Labels the site may add later end up in `Other` verbatim, so nothing read
/// from a page is lost.
#[derive(Clone, PartialEq, Eq, Hash, Debug, SerializeDisplay, DeserializeFromStr)]
pub enum Tier {
    Platinum,
    Gold,
    Silver,
    Bronze,
    Borked,
    Pending,
    Other(String),
}
impl Tier {
    fn is_blank(&self) -> bool {
        matches!(self, Tier::Other(label) if label.trim().is_empty())
    }
}
impl From<&str> for Tier {
    fn from(label: &str) -> Self {
        let label = label.trim();
        match label.to_ascii_lowercase().as_str() {
            "platinum" => Self::Platinum,
            "gold" => Self::Gold,
            "silver" => Self::Silver,
            "bronze" => Self::Bronze,
            "borked" => Self::Borked,
            "pending" => Self::Pending,
            _ => Self::Other(label.to_owned()),
        }
    }
}
impl FromStr for Tier {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}
impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Platinum => "platinum",
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
            Self::Borked => "borked",
            Self::Pending => "pending",
            Self::Other(label) => label.as_str(),
        })
    }
}

/// The json file written at the end of a run.
#[derive(Debug, Serialize, Deserialize)]
pub struct OutputDocument {
    pub meta: RunMetadata,
    pub games: Vec<GameRecord>,
}

#[derive(Debug, TypedBuilder, Serialize, Deserialize)]
pub struct RunMetadata {
    #[builder(default = crate::output::CREATOR.to_owned())]
    pub creator: String,
    pub timestamp: DateTime<Utc>,
    pub source: Url,
    pub pages_visited: u32,
    pub games_count: usize,
    pub exhausted: bool,
    pub partial: bool,
    pub settings: Settings,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{AppId, GameRecord, Tier};

    #[test]
    fn tier_parses_case_insensitively_and_keeps_unknown_labels() {
        assert_eq!("Platinum".parse::<Tier>().unwrap(), Tier::Platinum);
        assert_eq!(" BORKED ".parse::<Tier>().unwrap(), Tier::Borked);
        assert_eq!(
            "Awaiting".parse::<Tier>().unwrap(),
            Tier::Other("Awaiting".to_owned())
        );
        assert_eq!(Tier::Gold.to_string(), "gold");
        assert_eq!(Tier::Other("Awaiting".to_owned()).to_string(), "Awaiting");
    }

    #[test]
    fn app_id_rejects_empty_strings() {
        assert!(AppId::try_from("  ".to_owned()).is_err());
        assert!(serde_json::from_str::<AppId>(r#""""#).is_err());
        let id: AppId = serde_json::from_str(r#""620""#).unwrap();
        let raw: &str = id.as_ref();
        assert_eq!(raw, "620");
        assert_eq!(id.steam_link(), "https://store.steampowered.com/app/620");
    }

    #[test]
    fn game_record_serializes_in_declaration_order() {
        let record = GameRecord::builder()
            .name("Portal 2".to_owned().into())
            .identifier(AppId::try_from("620".to_owned()).unwrap())
            .rating(Tier::Platinum)
            .score(Some(1234u32.into()))
            .metadata(BTreeMap::from([("steam_link".to_owned(), "x".to_owned())]))
            .build();
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"name":"Portal 2","identifier":"620","rating":"platinum","score":1234,"metadata":{"steam_link":"x"}}"#
        );
    }

    #[test]
    fn optional_fields_are_omitted_and_count_towards_completeness() {
        let bare = GameRecord::builder()
            .name("Portal 2".to_owned().into())
            .identifier(AppId::try_from("620".to_owned()).unwrap())
            .rating(Tier::Gold)
            .build();
        assert_eq!(
            serde_json::to_string(&bare).unwrap(),
            r#"{"name":"Portal 2","identifier":"620","rating":"gold"}"#
        );
        assert_eq!(bare.populated_fields(), 2);

        let with_score = GameRecord::builder()
            .name("Portal 2".to_owned().into())
            .identifier(AppId::try_from("620".to_owned()).unwrap())
            .rating(Tier::Gold)
            .score(Some(3u32.into()))
            .build();
        assert_eq!(with_score.populated_fields(), 3);
    }
}
