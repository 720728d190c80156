//! Prismic API payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document as returned by the Prismic REST API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,

    #[serde(default)]
    pub uid: Option<String>,

    #[serde(rename = "type")]
    pub doc_type: String,

    #[serde(default, with = "prismic_date")]
    pub first_publication_date: Option<DateTime<Utc>>,

    #[serde(default, with = "prismic_date")]
    pub last_publication_date: Option<DateTime<Utc>>,

    /// Custom fields, shaped by the document type
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Response of `GET {endpoint}/documents/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results_per_page: u32,
    #[serde(default)]
    pub total_results_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub prev_page: Option<String>,
    #[serde(default)]
    pub results: Vec<Document>,
}

/// A content release reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRef {
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "isMasterRef")]
    pub is_master_ref: bool,
}

/// Response of `GET {endpoint}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    #[serde(default)]
    pub refs: Vec<ApiRef>,
}

impl ApiInfo {
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

/// Prismic timestamps look like `2021-03-25T19:25:28+0000`, which is not RFC 3339
pub(crate) mod prismic_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .or_else(|_| DateTime::parse_from_str(value, FORMAT))
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(
        date: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_document() {
        let json = r#"{
            "id": "YFzBtxIAACQAqGvW",
            "uid": "como-utilizar-hooks",
            "type": "posts",
            "first_publication_date": "2021-03-25T19:25:28+0000",
            "last_publication_date": null,
            "data": {"title": "Como utilizar Hooks"}
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.uid.as_deref(), Some("como-utilizar-hooks"));
        assert_eq!(doc.doc_type, "posts");
        assert_eq!(
            doc.first_publication_date,
            Some(Utc.with_ymd_and_hms(2021, 3, 25, 19, 25, 28).unwrap())
        );
        assert!(doc.last_publication_date.is_none());
        assert_eq!(doc.data["title"], "Como utilizar Hooks");
    }

    #[test]
    fn test_rfc3339_dates_accepted() {
        assert_eq!(
            prismic_date::parse("2021-01-01T00:00:00+00:00"),
            Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(prismic_date::parse("yesterday").is_none());
    }

    #[test]
    fn test_master_ref() {
        let json = r#"{"refs": [
            {"id": "preview", "ref": "YF-draft", "label": "Draft"},
            {"id": "master", "ref": "YF-master", "label": "Master", "isMasterRef": true}
        ]}"#;
        let info: ApiInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.master_ref(), Some("YF-master"));
    }

    #[test]
    fn test_search_response_next_page() {
        let json = r#"{
            "page": 1, "results_per_page": 1, "total_results_size": 3, "total_pages": 3,
            "next_page": "https://blog.cdn.prismic.io/api/v2/documents/search?page=2",
            "prev_page": null,
            "results": []
        }"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.total_pages, 3);
        assert!(resp.next_page.unwrap().ends_with("page=2"));
    }
}
