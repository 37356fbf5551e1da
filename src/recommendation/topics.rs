//! Topic catalog
//!
//! The closed set of CSE topics and the two static lookup tables built on it:
//! course-id substrings that feed mastery, and the candidate courses the
//! ranker scores. Extending the candidate set means adding a table row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A curriculum topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "DBMS")]
    Dbms,
    #[serde(rename = "DSA")]
    Dsa,
    #[serde(rename = "OS")]
    Os,
    #[serde(rename = "CN")]
    Cn,
    #[serde(rename = "OOP")]
    Oop,
    #[serde(rename = "System Design")]
    SystemDesign,
    #[serde(rename = "AI/ML Basics")]
    AiMlBasics,
    #[serde(rename = "Cyber Security")]
    CyberSecurity,
}

impl Topic {
    /// Display name used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Topic::Dbms => "DBMS",
            Topic::Dsa => "DSA",
            Topic::Os => "OS",
            Topic::Cn => "CN",
            Topic::Oop => "OOP",
            Topic::SystemDesign => "System Design",
            Topic::AiMlBasics => "AI/ML Basics",
            Topic::CyberSecurity => "Cyber Security",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase course-id substrings that attribute a quiz score to a topic.
/// An id containing several keys counts toward each of them.
pub const MASTERY_KEYS: [(&str, Topic); 5] = [
    ("dbms", Topic::Dbms),
    ("dsa", Topic::Dsa),
    ("os", Topic::Os),
    ("cn", Topic::Cn),
    ("oop", Topic::Oop),
];

/// A recommendable course
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    /// Short key; the course id is `course_<key>`
    pub key: &'static str,
    pub topic: Topic,
    pub reason: &'static str,
}

impl CatalogEntry {
    pub fn course_id(&self) -> String {
        format!("course_{}", self.key)
    }
}

/// Candidate courses in scoring order
pub const COURSE_CATALOG: [CatalogEntry; 8] = [
    CatalogEntry {
        key: "dbms",
        topic: Topic::Dbms,
        reason: "Recommended because you're progressing well in databases.",
    },
    CatalogEntry {
        key: "dsa",
        topic: Topic::Dsa,
        reason: "Essential skill for technical interviews and coding.",
    },
    CatalogEntry {
        key: "os",
        topic: Topic::Os,
        reason: "Foundation for system understanding.",
    },
    CatalogEntry {
        key: "cn",
        topic: Topic::Cn,
        reason: "Critical for networking and distributed systems.",
    },
    CatalogEntry {
        key: "oop",
        topic: Topic::Oop,
        reason: "Core programming paradigm to master.",
    },
    CatalogEntry {
        key: "system",
        topic: Topic::SystemDesign,
        reason: "Next step after mastering fundamentals.",
    },
    CatalogEntry {
        key: "ml",
        topic: Topic::AiMlBasics,
        reason: "Trending field with career opportunities.",
    },
    CatalogEntry {
        key: "cyber",
        topic: Topic::CyberSecurity,
        reason: "Increasingly important skill in tech.",
    },
];
