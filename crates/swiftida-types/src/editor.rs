//! Read-modify-write of a declared function type.

use crate::database::TypeStore;
use crate::edit::EditRequest;
use crate::signature::ParsedSignature;
use swiftida_core::{ArchProfile, EntityId, Error, Result};
use tracing::{debug, info, warn};

/// Applies edits to declared types for one target architecture.
#[derive(Debug, Clone, Copy)]
pub struct SignatureEditor<'a> {
    profile: &'a ArchProfile,
}

impl<'a> SignatureEditor<'a> {
    pub fn new(profile: &'a ArchProfile) -> Self {
        Self { profile }
    }

    /// Parse, edit and serialize a type string without touching any store.
    pub fn rewrite(&self, raw: &str, request: EditRequest) -> Result<String> {
        let sig = ParsedSignature::parse(raw, self.profile)?;
        let sig = request.apply(sig, self.profile)?;
        Ok(sig.serialize())
    }

    /// Apply `request` to the declared type of `entity` and persist it.
    ///
    /// On error the store keeps the previous type. A tuple struct requested
    /// by the edit may already have been created; creation is idempotent.
    pub fn edit<S>(&self, store: &mut S, entity: EntityId, request: EditRequest) -> Result<String>
    where
        S: TypeStore + ?Sized,
    {
        let result = self.try_edit(store, entity, request);
        if let Err(err) = &result {
            warn!(%entity, %request, "{}: {}", err.user_message(), err);
        }
        result
    }

    fn try_edit<S>(&self, store: &mut S, entity: EntityId, request: EditRequest) -> Result<String>
    where
        S: TypeStore + ?Sized,
    {
        let original = store
            .get_declared_type(entity)
            .ok_or(Error::NoDeclaredType(entity))?;
        debug!("Original type: {}", original);

        let sig = ParsedSignature::parse(&original, self.profile)?;
        let sig = request.apply(sig, self.profile)?;

        if let Some((name, words)) = request.tuple_struct() {
            store.create_tuple_struct(&name, words);
        }

        let new_type = sig.serialize();
        info!("New type: {}", new_type);

        if !store.set_declared_type(entity, &new_type) {
            return Err(Error::TypeCommitFailed {
                entity,
                signature: new_type,
            });
        }

        info!("Type changed successfully");
        Ok(new_type)
    }
}
