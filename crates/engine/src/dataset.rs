//! Flat-file datasets.
//!
//! A dataset directory holds one JSON array per collection:
//!
//! - `donations.json`
//! - `campaigns.json`
//! - `organizations.json`
//!
//! A missing file is read as an empty collection. A file that exists but
//! does not parse is an error.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;

use crate::{Campaign, Donation, Organization, ResultEngine};

pub const DONATIONS_FILE: &str = "donations.json";
pub const CAMPAIGNS_FILE: &str = "campaigns.json";
pub const ORGANIZATIONS_FILE: &str = "organizations.json";

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub donations: Vec<Donation>,
    pub campaigns: Vec<Campaign>,
    pub organizations: Vec<Organization>,
}

impl Dataset {
    /// Reads every collection from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> ResultEngine<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            donations: read_collection(dir.join(DONATIONS_FILE))?,
            campaigns: read_collection(dir.join(CAMPAIGNS_FILE))?,
            organizations: read_collection(dir.join(ORGANIZATIONS_FILE))?,
        })
    }
}

/// Reads a JSON array from `path`, returning an empty list when the file
/// does not exist.
pub fn read_collection<T: DeserializeOwned>(path: PathBuf) -> ResultEngine<Vec<T>> {
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    Ok(serde_json::from_slice(&bytes)?)
}
