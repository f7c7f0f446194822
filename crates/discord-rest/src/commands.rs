//! The bot's slash-command surface.

use crate::types::{CommandDefinition, CommandOption, OPTION_TYPE_BOOLEAN, OPTION_TYPE_INTEGER};

pub const VERIFY_MEMBERS: &str = "verify-members";
pub const VERIFY_STUDENTS: &str = "verify-students";

/// Both commands, in registration order.
pub fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition {
            name: VERIFY_MEMBERS.to_string(),
            description: "Verify members based on registration data".to_string(),
            options: vec![
                CommandOption {
                    kind: OPTION_TYPE_BOOLEAN,
                    name: "dryrun".to_string(),
                    description: "Whether to do a dry run, with no effects. True by default."
                        .to_string(),
                    required: false,
                },
                CommandOption {
                    kind: OPTION_TYPE_INTEGER,
                    name: "batchsize".to_string(),
                    description: "How many entries to attempt to process on this command."
                        .to_string(),
                    required: false,
                },
            ],
        },
        CommandDefinition {
            name: VERIFY_STUDENTS.to_string(),
            description: "Assign the student role based on class registration data".to_string(),
            options: vec![
                CommandOption {
                    kind: OPTION_TYPE_INTEGER,
                    name: "start-row".to_string(),
                    description: "The sheet row to start from.".to_string(),
                    required: true,
                },
                CommandOption {
                    kind: OPTION_TYPE_INTEGER,
                    name: "batchsize".to_string(),
                    description: "How many entries to attempt to process on this command."
                        .to_string(),
                    required: true,
                },
            ],
        },
    ]
}
