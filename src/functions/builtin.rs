//! Declarations of the platform's built-in functions.

use crate::functions::definition::{FunctionDefinition, ParameterSchema, ParameterType};

fn param(kind: ParameterType, title: &str, description: &str) -> ParameterSchema {
    ParameterSchema::new(kind).title(title).description(description)
}

pub fn create_channel() -> FunctionDefinition {
    FunctionDefinition::new("create_channel", "Create a channel")
        .description("Create a Slack channel")
        .input("channel_name", param(ParameterType::String, "Channel name", "Name of the new channel"), true)
        .input(
            "manager_ids",
            ParameterSchema::array_of(ParameterSchema::new(ParameterType::UserId))
                .title("Channel managers")
                .description("Users to make channel managers"),
            false,
        )
        .input("is_private", param(ParameterType::Boolean, "Make channel private", "Create a private channel"), false)
        .output("channel_id", param(ParameterType::ChannelId, "Channel", "The ID of the new channel"), true)
}

pub fn create_usergroup() -> FunctionDefinition {
    FunctionDefinition::new("create_usergroup", "Create a user group")
        .description("Create a user group")
        .input("usergroup_handle", param(ParameterType::String, "Handle", "A mention handle, e.g. @on-call"), true)
        .input("usergroup_name", param(ParameterType::String, "Display name", "A name for the user group"), true)
        .output("usergroup_id", param(ParameterType::UsergroupId, "User group", "The ID of the new user group"), true)
}

pub fn open_form() -> FunctionDefinition {
    FunctionDefinition::new("open_form", "Open a form")
        .description("Opens a form in a modal and waits for it to be submitted")
        .input("title", param(ParameterType::String, "Title", "Title of the form"), true)
        .input("description", param(ParameterType::String, "Description", "Text shown above the fields"), false)
        .input("submit_label", param(ParameterType::String, "Submit button label", "Defaults to \"Submit\""), false)
        .input("fields", param(ParameterType::FormInput, "Fields", "Input elements of the form"), true)
        .input("interactivity", param(ParameterType::Interactivity, "Interactivity", "Context of the user action that opens the form"), true)
        .output("fields", param(ParameterType::Object, "Fields", "Submitted values keyed by field name"), true)
        .output("interactivity", param(ParameterType::Interactivity, "Interactivity", "Context of the form submission"), true)
}

pub fn send_message() -> FunctionDefinition {
    FunctionDefinition::new("send_message", "Send a message")
        .description("Send a message to a channel")
        .input("channel_id", param(ParameterType::ChannelId, "Channel", "Where to post the message"), true)
        .input("message", param(ParameterType::RichText, "Message", "Message content"), true)
        .output("message_ts", param(ParameterType::MessageTs, "Message timestamp", "Timestamp of the posted message"), true)
}

/// Every built-in declaration, in catalog order.
pub fn catalog() -> Vec<FunctionDefinition> {
    vec![create_channel(), create_usergroup(), open_form(), send_message()]
}

/// Look up a built-in by callback ID.
pub fn lookup(callback_id: &str) -> Option<FunctionDefinition> {
    catalog().into_iter().find(|d| d.callback_id == callback_id)
}
