//! Commands that edit declared types stored in a JSON type database.

use anyhow::{bail, Context, Result};
use std::path::Path;
use swiftida_core::{ArchProfile, EntityId, Selection};
use swiftida_types::{CommandRegistry, TypeDatabase};
use tracing::debug;

fn load_database(path: &Path) -> Result<TypeDatabase> {
    TypeDatabase::load(path)
        .with_context(|| format!("Failed to load type database: {}", path.display()))
}

fn save_database(db: &TypeDatabase, path: &Path) -> Result<()> {
    db.save(path)
        .with_context(|| format!("Failed to save type database: {}", path.display()))
}

/// Record (or overwrite) the declared type of an entity.
pub fn handle_declare(path: &Path, entity: EntityId, ty: &str) -> Result<()> {
    let mut db = if path.exists() {
        load_database(path)?
    } else {
        debug!("creating type database {}", path.display());
        TypeDatabase::new()
    };

    db.declare(entity, ty);
    save_database(&db, path)?;
    println!("{}: {}", entity, ty);
    Ok(())
}

/// Dispatch an edit command against an entity and persist the result.
pub fn handle_apply(
    profile: &ArchProfile,
    path: &Path,
    entity: EntityId,
    command: &str,
    call_site: bool,
) -> Result<()> {
    let mut db = load_database(path)?;
    let registry = CommandRegistry::for_profile(profile);

    let selection = if call_site {
        Selection::CallOperand { callee: entity }
    } else {
        Selection::FunctionDefinition(entity)
    };

    let new_type = match registry.dispatch(command, &selection, &mut db) {
        Ok(new_type) => new_type,
        Err(err) => {
            eprintln!("warning: {}", err.user_message());
            return Err(err).with_context(|| format!("Command '{}' failed on {}", command, entity));
        }
    };

    save_database(&db, path)?;
    println!("{}", new_type);
    Ok(())
}

/// Print declared types and structs.
pub fn handle_show(path: &Path, entity: Option<EntityId>) -> Result<()> {
    let db = load_database(path)?;

    if let Some(entity) = entity {
        match db.declared_type(entity) {
            Some(ty) => println!("{}: {}", entity, ty),
            None => bail!("Entity {} has no declared type", entity),
        }
        return Ok(());
    }

    println!("Declared types:");
    println!("{}", "=".repeat(50));
    for (id, ty) in db.entities() {
        println!("  {:<18} {}", id.to_string(), ty);
    }

    println!("\nStructs:");
    for name in db.struct_names() {
        if let Some(st) = db.get_struct(name) {
            println!("{}", st.to_c_string());
        }
    }
    Ok(())
}
