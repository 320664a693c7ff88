//! Named edit commands, as a host would register them as menu actions.
//!
//! The registry depends on the profile: one multi-return command exists per
//! usable tuple width.

use crate::database::TypeStore;
use crate::edit::EditRequest;
use crate::editor::SignatureEditor;
use swiftida_core::{ArchProfile, Error, HiddenRole, Result, Selection};
use tracing::{debug, warn};

/// Popup submenu the commands are grouped under.
pub const MENU_PATH: &str = "SwiftIDA/";

const ID_PREFIX: &str = "swiftida:";

/// A registered edit command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Unique identifier, e.g. `swiftida:add_arg_self`.
    pub id: String,
    /// Menu label.
    pub label: String,
    pub request: EditRequest,
}

impl Command {
    pub fn new(request: EditRequest) -> Self {
        let (name, label) = match request {
            EditRequest::ConvertToExplicitCallingConvention => (
                "convert_to_usercall".to_string(),
                "Convert to usercall".to_string(),
            ),
            EditRequest::AddHiddenArgument(role) => (
                format!("add_arg_{}", role.name()),
                format!("Add argument {}", role.name()),
            ),
            EditRequest::MakeMultiRegisterReturn(words) => (
                format!("make_multi_{}", words),
                format!("Make multi-return tuple{}", words),
            ),
        };
        Self {
            id: format!("{}{}", ID_PREFIX, name),
            label,
            request,
        }
    }

    /// The identifier without the `swiftida:` prefix.
    pub fn short_name(&self) -> &str {
        self.id.strip_prefix(ID_PREFIX).unwrap_or(&self.id)
    }
}

/// All commands available for one architecture profile.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    profile: ArchProfile,
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn for_profile(profile: &ArchProfile) -> Self {
        let mut commands = vec![Command::new(
            EditRequest::ConvertToExplicitCallingConvention,
        )];
        commands.extend(
            HiddenRole::ALL
                .into_iter()
                .map(|role| Command::new(EditRequest::AddHiddenArgument(role))),
        );
        commands.extend(
            (2..=profile.max_tuple_words())
                .map(|words| Command::new(EditRequest::MakeMultiRegisterReturn(words))),
        );

        Self {
            profile: *profile,
            commands,
        }
    }

    /// Look a command up by full id or by its short name.
    pub fn get(&self, id: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|c| c.id == id || c.short_name() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run the command `id` against the entity behind `selection`.
    pub fn dispatch<S>(&self, id: &str, selection: &Selection, store: &mut S) -> Result<String>
    where
        S: TypeStore + ?Sized,
    {
        let entity = selection.entity();
        let Some(command) = self.get(id) else {
            let err = Error::UnknownCommand(id.to_string());
            warn!(%entity, command = id, "{}: {}", err.user_message(), err);
            return Err(err);
        };
        debug!(command = %command.id, %entity, "dispatching");

        SignatureEditor::new(&self.profile).edit(store, entity, command.request)
    }
}
