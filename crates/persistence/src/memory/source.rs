// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::InMemoryStore;
use crate::error::PersistenceError;
use std::collections::{BTreeSet, HashMap};
use std::sync::PoisonError;
use tracing::{trace, warn};
use tracker::{IdentityService, PreheatSource};
use tracker_domain::{
    CategoryOptionCombo, Metadata, MetadataKind, MetadataObject, ProgramInstance, ProgramOwner,
    ProgramStageInstance, RelationshipInstance, TrackedEntityComment, TrackedEntityInstance,
    TrackerIdSchemeParam, User,
};

impl InMemoryStore {
    /// Resolves file resources, which are never cached since imports
    /// toggle their assigned flag.
    fn find_file_resources(
        &self,
        scheme: &TrackerIdSchemeParam,
        identifiers: &BTreeSet<String>,
    ) -> Result<Vec<MetadataObject>, PersistenceError> {
        let data = self.read("finding file resources")?;
        Ok(data
            .file_resources
            .values()
            .filter(|file_resource| {
                scheme
                    .identify(*file_resource)
                    .is_some_and(|identifier| identifiers.contains(&identifier))
            })
            .cloned()
            .map(MetadataObject::from)
            .collect())
    }
}

impl PreheatSource for InMemoryStore {
    type Error = PersistenceError;

    fn find_metadata(
        &self,
        kind: MetadataKind,
        scheme: &TrackerIdSchemeParam,
        identifiers: &BTreeSet<String>,
    ) -> Result<Vec<MetadataObject>, PersistenceError> {
        if kind == MetadataKind::FileResource {
            return self.find_file_resources(scheme, identifiers);
        }

        let mut found: Vec<MetadataObject> = Vec::with_capacity(identifiers.len());
        let mut misses: BTreeSet<&str> = BTreeSet::new();
        {
            let lookups = self.lookups.read().unwrap_or_else(PoisonError::into_inner);
            for identifier in identifiers {
                match lookups.get(&(kind, scheme.clone(), identifier.clone())) {
                    Some(Some(object)) => found.push(object.clone()),
                    Some(None) => {}
                    None => {
                        misses.insert(identifier.as_str());
                    }
                }
            }
        }
        if misses.is_empty() {
            return Ok(found);
        }

        let mut resolved: HashMap<String, MetadataObject> = HashMap::new();
        {
            let data = self.read("finding metadata")?;
            for object in data.metadata.iter().filter(|object| object.kind() == kind) {
                if let Some(identifier) = scheme.identify(object.as_identifiable())
                    && misses.contains(identifier.as_str())
                {
                    resolved
                        .entry(identifier)
                        .or_insert_with(|| object.clone());
                }
            }
        }
        trace!(
            ?kind,
            scheme = %scheme,
            requested = misses.len(),
            resolved = resolved.len(),
            "Metadata lookup cache miss"
        );

        let mut lookups = self
            .lookups
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for identifier in misses {
            let object: Option<MetadataObject> = resolved.remove(identifier);
            if let Some(object) = &object {
                found.push(object.clone());
            }
            lookups.insert((kind, scheme.clone(), identifier.to_string()), object);
        }
        drop(lookups);
        Ok(found)
    }

    fn find_category_option_combo(
        &self,
        category_options: &BTreeSet<String>,
    ) -> Result<Option<CategoryOptionCombo>, PersistenceError> {
        let data = self.read("finding a category option combo")?;
        Ok(data
            .metadata
            .iter()
            .filter_map(CategoryOptionCombo::from_object)
            .find(|combo| {
                let options: BTreeSet<&String> = combo.category_options.iter().collect();
                options.len() == category_options.len()
                    && category_options.iter().all(|uid| options.contains(uid))
            })
            .cloned())
    }

    fn find_default_category_option_combo(
        &self,
    ) -> Result<Option<CategoryOptionCombo>, PersistenceError> {
        let data = self.read("finding the default category option combo")?;
        Ok(data
            .metadata
            .iter()
            .filter_map(CategoryOptionCombo::from_object)
            .find(|combo| combo.is_default)
            .cloned())
    }

    fn find_tracked_entities(
        &self,
        uids: &BTreeSet<String>,
    ) -> Result<Vec<TrackedEntityInstance>, PersistenceError> {
        let data = self.read("finding tracked entities")?;
        Ok(uids
            .iter()
            .filter_map(|uid| data.tracked_entity(uid))
            .collect())
    }

    fn find_enrollments(
        &self,
        uids: &BTreeSet<String>,
    ) -> Result<Vec<ProgramInstance>, PersistenceError> {
        let data = self.read("finding enrollments")?;
        Ok(uids
            .iter()
            .filter_map(|uid| data.enrollments.get(uid))
            .cloned()
            .collect())
    }

    fn find_events(
        &self,
        uids: &BTreeSet<String>,
    ) -> Result<Vec<ProgramStageInstance>, PersistenceError> {
        let data = self.read("finding events")?;
        Ok(uids.iter().filter_map(|uid| data.event(uid)).collect())
    }

    fn find_relationships(
        &self,
        uids: &BTreeSet<String>,
    ) -> Result<Vec<RelationshipInstance>, PersistenceError> {
        let data = self.read("finding relationships")?;
        Ok(uids
            .iter()
            .filter_map(|uid| data.relationships.get(uid))
            .cloned()
            .collect())
    }

    fn find_program_owners(
        &self,
        tracked_entities: &BTreeSet<String>,
    ) -> Result<Vec<ProgramOwner>, PersistenceError> {
        let data = self.read("finding program owners")?;
        Ok(data
            .program_owners
            .values()
            .filter(|owner| tracked_entities.contains(&owner.tracked_entity))
            .cloned()
            .collect())
    }

    fn find_enrollments_with_events(
        &self,
        enrollments: &BTreeSet<String>,
    ) -> Result<Vec<String>, PersistenceError> {
        let data = self.read("finding enrollments with events")?;
        let with_events: BTreeSet<String> = data
            .events
            .values()
            .filter(|event| !event.deleted)
            .filter_map(|event| event.program_instance.clone())
            .filter(|enrollment| enrollments.contains(enrollment))
            .collect();
        Ok(with_events.into_iter().collect())
    }

    fn find_program_stages_with_events(
        &self,
        enrollments: &BTreeSet<String>,
    ) -> Result<Vec<(String, String)>, PersistenceError> {
        let data = self.read("finding program stages with events")?;
        let pairs: BTreeSet<(String, String)> = data
            .events
            .values()
            .filter(|event| !event.deleted)
            .filter_map(|event| {
                event
                    .program_instance
                    .as_ref()
                    .filter(|enrollment| enrollments.contains(*enrollment))
                    .map(|enrollment| (event.program_stage.clone(), enrollment.clone()))
            })
            .collect();
        Ok(pairs.into_iter().collect())
    }

    fn find_users(&self, usernames: &BTreeSet<String>) -> Result<Vec<User>, PersistenceError> {
        let data = self.read("finding users")?;
        Ok(data
            .users
            .values()
            .filter(|user| usernames.contains(&user.username))
            .cloned()
            .collect())
    }

    fn find_notes(
        &self,
        uids: &BTreeSet<String>,
    ) -> Result<Vec<TrackedEntityComment>, PersistenceError> {
        let data = self.read("finding notes")?;
        Ok(uids
            .iter()
            .filter_map(|uid| data.comments.get(uid))
            .cloned()
            .collect())
    }
}

impl IdentityService for InMemoryStore {
    fn user_by_uid(&self, uid: &str) -> Option<User> {
        match self.read("loading a user") {
            Ok(data) => data.users.get(uid).cloned(),
            Err(err) => {
                warn!(%err, uid, "Could not load user");
                None
            }
        }
    }

    fn current_user(&self) -> Option<User> {
        match self.read("loading the current user") {
            Ok(data) => data
                .current_user
                .as_ref()
                .and_then(|uid| data.users.get(uid))
                .cloned(),
            Err(err) => {
                warn!(%err, "Could not load current user");
                None
            }
        }
    }
}
