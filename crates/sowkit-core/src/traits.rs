use std::collections::{BTreeMap, HashMap};

use crate::model::{CatalogEntry, ProcessRecord, ToolRecord};
use crate::types::Status;

/// Anything carrying an assessed status: processes and tools.
pub trait Assessed {
    fn name(&self) -> &str;
    fn status(&self) -> &Status;
    fn add_to_engagement(&self) -> bool;
}

impl<T: Assessed + ?Sized> Assessed for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn status(&self) -> &Status {
        (**self).status()
    }

    fn add_to_engagement(&self) -> bool {
        (**self).add_to_engagement()
    }
}

impl Assessed for ProcessRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> &Status {
        &self.status
    }

    fn add_to_engagement(&self) -> bool {
        self.add_to_engagement
    }
}

impl Assessed for ToolRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> &Status {
        &self.status
    }

    fn add_to_engagement(&self) -> bool {
        self.add_to_engagement
    }
}

/// Read-only lookup into the service catalog.
pub trait ServiceCatalog {
    fn lookup(&self, service_id: &str) -> Option<&CatalogEntry>;
}

impl ServiceCatalog for HashMap<String, CatalogEntry> {
    fn lookup(&self, service_id: &str) -> Option<&CatalogEntry> {
        self.get(service_id)
    }
}

impl ServiceCatalog for BTreeMap<String, CatalogEntry> {
    fn lookup(&self, service_id: &str) -> Option<&CatalogEntry> {
        self.get(service_id)
    }
}
