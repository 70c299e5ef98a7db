use cmeet_ref::{PostId, UserId};
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_with::{serde_as, DefaultOnError};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Privacy mode of a post. Anything the store hands us that is not one of
/// the three known values decodes as `Unknown`, and `Unknown` is treated as
/// `Private` everywhere (default-deny).
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Friends,
    Private,
    Unknown,
}

impl Default for Privacy {
    fn default() -> Self {
        Privacy::Private
    }
}

impl<'de> Deserialize<'de> for Privacy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Ok(match string.as_str() {
            "public" => Privacy::Public,
            "friends" => Privacy::Friends,
            "private" => Privacy::Private,
            _ => Privacy::Unknown,
        })
    }
}

/// A reaction kind. Legacy records store a bare boolean `true` under
/// `likes/{userId}`; newer records store a reaction-kind string. Both decode
/// to a `Reaction`, booleans as the legacy `"like"` kind.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Reaction(pub String);

impl Reaction {
    pub const LIKE: &'static str = "like";

    pub fn like() -> Self {
        Reaction(Self::LIKE.to_string())
    }

    pub fn kind(&self) -> &str {
        self.0.as_str()
    }
}

impl<'de> Deserialize<'de> for Reaction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DeserializeReaction;

        impl<'de> Visitor<'de> for DeserializeReaction {
            type Value = Reaction;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("string or bool")
            }

            fn visit_bool<E>(self, _value: bool) -> Result<Reaction, E>
            where
                E: de::Error,
            {
                Ok(Reaction::like())
            }

            fn visit_str<E>(self, value: &str) -> Result<Reaction, E>
            where
                E: de::Error,
            {
                Ok(Reaction(value.to_string()))
            }
        }

        deserializer.deserialize_any(DeserializeReaction)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author_id: UserId,
    pub text: String,
    #[serde(alias = "timestamp")]
    pub timestamp_ms: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub question: String,
    pub options: Vec<String>,
    // at most one vote per user, last write wins
    #[serde(default)]
    pub votes: BTreeMap<UserId, usize>,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    /// Display identity captured at creation time; `None` when the author
    /// posted anonymously.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub privacy: Privacy,
    #[serde(alias = "timestamp")]
    pub timestamp_ms: i64,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub likes: BTreeMap<UserId, Reaction>,
    // keyed by store push id, so key order is time order
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub comments: BTreeMap<String, Comment>,
    /// Token sets cached at creation time, frozen thereafter. `None` on
    /// legacy posts that predate caching.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub hashtags: Option<BTreeSet<String>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub mentions: Option<BTreeSet<String>>,
    /// Author-supplied mood label; authoritative over any inferred mood.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub mood_tag: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub poll: Option<Poll>,
}

impl Post {
    pub fn reaction_count(&self) -> usize {
        self.likes.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    pub fn is_private_to_author(&self) -> bool {
        matches!(self.privacy, Privacy::Private | Privacy::Unknown)
    }
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub chronological_feed: bool,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMood {
    pub mood: String,
    #[serde(alias = "timestamp")]
    pub timestamp_ms: i64,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub display_name: Option<String>,
    /// Comma-separated free text, as entered in the profile form.
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub location: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub current_mood: Option<CurrentMood>,
    #[serde(default)]
    pub settings: Settings,
}
