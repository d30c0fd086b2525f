use serde::{Deserialize, Serialize};

/// A third-party account whose codes are displayed. Owned by the caller's
/// storage; this crate only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub secret: String,
}

impl Account {
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            issuer: None,
            secret: secret.into(),
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn label(&self) -> String {
        match &self.issuer {
            Some(issuer) => format!("{} ({})", issuer, self.name),
            None => self.name.clone(),
        }
    }
}

/// Read-only lookup of stored accounts.
pub trait AccountSource {
    fn accounts(&self) -> Vec<Account>;

    fn find(&self, name: &str) -> Option<Account> {
        self.accounts().into_iter().find(|a| a.name == name)
    }
}

impl AccountSource for Vec<Account> {
    fn accounts(&self) -> Vec<Account> {
        self.clone()
    }
}
