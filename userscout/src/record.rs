use serde::{Deserialize, Serialize};

/// A single user as returned by the record source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub company: Company,
}

/// Postal address of a user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
}

/// Employer of a user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub name: String,
    /// The company tagline. The source spells the key `catchPhrase`,
    /// persisted files spell it `catchphrase`; both decode.
    #[serde(
        default,
        rename(serialize = "catchphrase", deserialize = "catchPhrase"),
        alias = "catchphrase"
    )]
    pub catch_phrase: String,
}

impl Record {
    /// The text the filter predicate is evaluated against
    pub fn tagline(&self) -> &str {
        &self.company.catch_phrase
    }
}

/// The records whose tagline satisfied the filter.
///
/// Only the collector builds a `MatchSet`; once handed out it is read-only.
/// Membership order reflects handoff order and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    records: Vec<Record>,
}

impl MatchSet {
    pub(crate) fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn contains_id(&self, id: i64) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    /// Records ordered by id, for stable output
    pub fn sorted_by_id(&self) -> Vec<&Record> {
        let mut sorted: Vec<&Record> = self.records.iter().collect();
        sorted.sort_by_key(|r| r.id);
        sorted
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE_JSON: &str = r#"[
        {
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": { "lat": "-37.3159", "lng": "81.1496" }
            },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": {
                "name": "Romaguera-Crona",
                "catchPhrase": "Multi-layered client-server neural-net",
                "bs": "harness real-time e-markets"
            }
        }
    ]"#;

    #[test]
    fn test_decode_source_payload() {
        let records: Vec<Record> = serde_json::from_str(SOURCE_JSON).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, 1);
        assert_eq!(r.name, "Leanne Graham");
        assert_eq!(r.address.zipcode, "92998-3874");
        assert_eq!(r.tagline(), "Multi-layered client-server neural-net");
    }

    #[test]
    fn test_missing_text_fields_default_to_empty() {
        let records: Vec<Record> = serde_json::from_str(r#"[{"id": 7}]"#).unwrap();
        assert_eq!(records[0].name, "");
        assert_eq!(records[0].address, Address::default());
        assert_eq!(records[0].tagline(), "");
    }

    #[test]
    fn test_persisted_key_spelling() {
        let record = Record {
            id: 3,
            name: "Clementine Bauch".to_string(),
            email: "Nathan@yesenia.net".to_string(),
            address: Address::default(),
            company: Company {
                name: "Romaguera-Jacobson".to_string(),
                catch_phrase: "Face to face bifurcated interface".to_string(),
            },
        };
        let yaml = serde_yaml::to_string(&record).unwrap();
        assert!(yaml.contains("catchphrase: Face to face bifurcated interface"));
        assert!(!yaml.contains("catchPhrase"));

        let decoded: Record = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_match_set_queries() {
        let make = |id| Record {
            id,
            name: format!("User {}", id),
            email: String::new(),
            address: Address::default(),
            company: Company::default(),
        };
        let set = MatchSet::from_records(vec![make(5), make(2), make(9)]);
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
        assert!(set.contains_id(2));
        assert!(!set.contains_id(4));
        let ids: Vec<i64> = set.sorted_by_id().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
        assert!(MatchSet::default().is_empty());
    }
}
