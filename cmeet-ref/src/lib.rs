use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::fmt;
use thiserror::Error as ThisError;

#[derive(Clone, Debug, ThisError)]
pub enum RefError {
    #[error("Does not match as {ref_type}: {input}")]
    BadFormat {
        ref_type: &'static str,
        input: String,
    },
}

fn id_regex() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex = Regex::new("^[A-Za-z0-9_-]+$").unwrap();
    }
    &*RE
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    // Store path segment, so no slashes and no whitespace
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "User",
                input: string,
            })
        } else {
            Ok(Self(string))
        }
    }

    pub fn is_match(string: &str) -> bool {
        id_regex().is_match(string)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for UserId {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UserId::from_string(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> String {
        value.0
    }
}

impl From<&UserId> for String {
    fn from(value: &UserId) -> String {
        value.0.clone()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PostId(String);

impl PostId {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Post",
                input: string,
            })
        } else {
            Ok(Self(string))
        }
    }

    pub fn is_match(string: &str) -> bool {
        id_regex().is_match(string)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for PostId {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PostId::from_string(value)
    }
}

impl From<PostId> for String {
    fn from(value: PostId) -> String {
        value.0
    }
}

impl From<&PostId> for String {
    fn from(value: &PostId) -> String {
        value.0.clone()
    }
}

pub fn hashtag_regex() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex = Regex::new("#(?P<tag>[A-Za-z0-9_]+)").unwrap();
    }
    &*RE
}

pub fn mention_regex() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex = Regex::new("@(?P<tag>[A-Za-z0-9_]+)").unwrap();
    }
    &*RE
}

/// Tokens are case-folded to lowercase and deduplicated.
pub fn extract_hashtags(text: &str) -> BTreeSet<String> {
    extract_tokens(hashtag_regex(), text)
}

pub fn extract_mentions(text: &str) -> BTreeSet<String> {
    extract_tokens(mention_regex(), text)
}

fn extract_tokens(regex: &Regex, text: &str) -> BTreeSet<String> {
    regex
        .captures_iter(text)
        .map(|caps| caps.name("tag").unwrap().as_str().to_lowercase())
        .collect()
}
