// ATXP tool definitions, grouped the way the CLI groups its subcommands

use crate::application::constants::{EXTENDED_OPERATION_TIMEOUT, LONG_OPERATION_TIMEOUT};
use crate::domain::ArgSpec::{Flag, Positional, Repeated, Switch};
use crate::domain::ParamKind::{Boolean, Enum, Number, String, StringList};
use crate::domain::{OperationDescriptor as Op, ParamSpec};

const DIRECTIONS: &[&str] = &["incoming", "sent"];

pub(super) fn all() -> Vec<Op> {
    let mut ops = Vec::new();
    ops.extend(account());
    ops.extend(paid_apis());
    ops.extend(email());
    ops.extend(phone());
    ops.extend(contacts());
    ops.extend(agents());
    ops
}

fn account() -> Vec<Op> {
    vec![
        Op::new(
            "atxp_register",
            "Self-register as a new ATXP agent. Creates an account instantly with a wallet, email, 10 IOU tokens, and a connection string. No human login needed.",
            "agent register",
        )
        .timeout(EXTENDED_OPERATION_TIMEOUT),
        Op::new(
            "atxp_login",
            "Authenticate with an ATXP connection string. Saves credentials to ~/.atxp/config.",
            "login",
        )
        .param(ParamSpec::required(
            "connection_string",
            String,
            "The full ATXP connection string URL",
        ))
        .arg(Flag("--token", "connection_string")),
        Op::new(
            "atxp_whoami",
            "Show account info: ID, type, email, wallet address, owner.",
            "whoami",
        ),
        Op::new(
            "atxp_balance",
            "Check ATXP account balance across all chains. Free to call.",
            "balance",
        ),
        Op::new(
            "atxp_fund",
            "Show all funding options: crypto deposit addresses (USDC on Base, Solana) and a shareable Stripe payment link. Use --amount to request a specific payment link amount. Free to call.",
            "fund",
        )
        .param(ParamSpec::optional(
            "amount",
            Number,
            "Suggested payment link amount in USD (1-1000, default 10)",
        ))
        .param(ParamSpec::optional(
            "open",
            Boolean,
            "Open the payment link in a browser",
        ))
        .arg(Flag("--amount", "amount"))
        .arg(Switch("--open", "open")),
        Op::new(
            "atxp_transactions",
            "View recent transaction history. Free to call.",
            "transactions",
        )
        .param(ParamSpec::optional(
            "limit",
            Number,
            "Number of transactions to show (default 10)",
        ))
        .arg(Flag("--limit", "limit")),
    ]
}

fn paid_apis() -> Vec<Op> {
    vec![
        Op::new(
            "atxp_search",
            "Real-time web search. Returns current results from the web. Paid per use.",
            "search",
        )
        .param(ParamSpec::required("query", String, "Search query"))
        .arg(Positional("query")),
        Op::new(
            "atxp_image",
            "Generate an AI image from a text prompt. Returns an image URL. Paid per use.",
            "image",
        )
        .param(ParamSpec::required("prompt", String, "Image generation prompt"))
        .arg(Positional("prompt"))
        .timeout(EXTENDED_OPERATION_TIMEOUT),
        Op::new(
            "atxp_video",
            "Generate an AI video from a text prompt. Returns a video URL. Paid per use.",
            "video",
        )
        .param(ParamSpec::required("prompt", String, "Video generation prompt"))
        .arg(Positional("prompt"))
        .timeout(LONG_OPERATION_TIMEOUT),
        Op::new(
            "atxp_music",
            "Generate AI music from a text prompt. Returns a music URL. Paid per use.",
            "music",
        )
        .param(ParamSpec::required("prompt", String, "Music generation prompt"))
        .arg(Positional("prompt"))
        .timeout(LONG_OPERATION_TIMEOUT),
        Op::new(
            "atxp_x_search",
            "Search X/Twitter for live posts and discussions. Paid per use.",
            "x",
        )
        .param(ParamSpec::required("query", String, "X/Twitter search query"))
        .arg(Positional("query")),
    ]
}

fn email() -> Vec<Op> {
    vec![
        Op::new(
            "atxp_email_inbox",
            "Check the agent's email inbox. Free to call. Each agent has a unique @atxp.email address.",
            "email inbox",
        ),
        Op::new(
            "atxp_email_read",
            "Read a specific email message by ID. Free to call.",
            "email read",
        )
        .param(ParamSpec::required("message_id", String, "The message ID to read"))
        .arg(Positional("message_id")),
        Op::new(
            "atxp_email_send",
            "Send an email from the agent's @atxp.email address. Costs $0.01 per email.",
            "email send",
        )
        .param(ParamSpec::required("to", String, "Recipient email address"))
        .param(ParamSpec::required("subject", String, "Email subject"))
        .param(ParamSpec::required("body", String, "Email body text"))
        .arg(Flag("--to", "to"))
        .arg(Flag("--subject", "subject"))
        .arg(Flag("--body", "body")),
        Op::new(
            "atxp_email_reply",
            "Reply to an email by message ID. Costs $0.01 per reply.",
            "email reply",
        )
        .param(ParamSpec::required("message_id", String, "The message ID to reply to"))
        .param(ParamSpec::required("body", String, "Reply body text"))
        .arg(Positional("message_id"))
        .arg(Flag("--body", "body")),
        Op::new(
            "atxp_email_search",
            "Search emails by subject or sender. Free to call.",
            "email search",
        )
        .param(ParamSpec::required("query", String, "Search query for emails"))
        .arg(Positional("query")),
        Op::new(
            "atxp_email_delete",
            "Delete an email message by ID. Free to call.",
            "email delete",
        )
        .param(ParamSpec::required("message_id", String, "The message ID to delete"))
        .arg(Positional("message_id")),
        Op::new(
            "atxp_email_get_attachment",
            "Download an email attachment by message ID and attachment index. Free to call.",
            "email get-attachment",
        )
        .param(ParamSpec::required(
            "message_id",
            String,
            "The message ID containing the attachment",
        ))
        .param(ParamSpec::required("index", Number, "Attachment index (0-based)"))
        .arg(Flag("--message", "message_id"))
        .arg(Flag("--index", "index")),
        Op::new(
            "atxp_email_claim_username",
            "Claim a human-readable email username (e.g., yourname@atxp.email). Costs $1.00.",
            "email claim-username",
        )
        .param(ParamSpec::required("username", String, "The username to claim"))
        .arg(Positional("username")),
        Op::new(
            "atxp_email_release_username",
            "Release your claimed email username. Free to call.",
            "email release-username",
        ),
    ]
}

fn phone() -> Vec<Op> {
    vec![
        Op::new(
            "atxp_phone_register",
            "Register a phone number for SMS and voice calls. Costs $2.00.",
            "phone register",
        )
        .param(ParamSpec::optional(
            "area_code",
            String,
            "Preferred area code (e.g., '415')",
        ))
        .arg(Flag("--area-code", "area_code"))
        .timeout(EXTENDED_OPERATION_TIMEOUT),
        Op::new(
            "atxp_phone_release",
            "Release your registered phone number. Free to call.",
            "phone release",
        ),
        Op::new(
            "atxp_phone_configure_voice",
            "Configure the AI voice agent for inbound/outbound calls. Free to call.",
            "phone configure-voice",
        )
        .param(ParamSpec::required("agent_name", String, "Name for the voice agent"))
        .param(ParamSpec::required(
            "voice_description",
            String,
            "Description of the agent's voice personality and behavior",
        ))
        .arg(Flag("--agent-name", "agent_name"))
        .arg(Flag("--voice-description", "voice_description")),
        Op::new("atxp_phone_sms", "Check SMS inbox. Free to call.", "phone sms")
            .param(ParamSpec::optional(
                "unread_only",
                Boolean,
                "Only show unread messages",
            ))
            .param(ParamSpec::optional(
                "direction",
                Enum(DIRECTIONS),
                "Filter by direction",
            ))
            .arg(Switch("--unread-only", "unread_only"))
            .arg(Flag("--direction", "direction")),
        Op::new(
            "atxp_phone_read_sms",
            "Read a specific SMS message by ID. Free to call.",
            "phone read-sms",
        )
        .param(ParamSpec::required("message_id", String, "The SMS message ID to read"))
        .arg(Positional("message_id")),
        Op::new(
            "atxp_phone_send_sms",
            "Send an SMS message. Costs $0.05. Optionally attach media for MMS.",
            "phone send-sms",
        )
        .param(ParamSpec::required("to", String, "Recipient phone number"))
        .param(ParamSpec::required("body", String, "Message text"))
        .param(ParamSpec::optional("media", String, "URL of media to attach (MMS)"))
        .arg(Flag("--to", "to"))
        .arg(Flag("--body", "body"))
        .arg(Flag("--media", "media")),
        Op::new(
            "atxp_phone_get_attachment",
            "Download an MMS attachment by message ID and index. Free to call.",
            "phone get-attachment",
        )
        .param(ParamSpec::required(
            "message_id",
            String,
            "The message ID containing the attachment",
        ))
        .param(ParamSpec::required("index", Number, "Attachment index (0-based)"))
        .arg(Flag("--message", "message_id"))
        .arg(Flag("--index", "index")),
        Op::new(
            "atxp_phone_call",
            "Make an AI-powered voice call. Costs $0.10 per call.",
            "phone call",
        )
        .param(ParamSpec::required("to", String, "Phone number to call"))
        .param(ParamSpec::required(
            "instruction",
            String,
            "Instructions for the AI voice agent during the call",
        ))
        .arg(Flag("--to", "to"))
        .arg(Flag("--instruction", "instruction"))
        .timeout(EXTENDED_OPERATION_TIMEOUT),
        Op::new("atxp_phone_calls", "Check call history. Free to call.", "phone calls")
            .param(ParamSpec::optional(
                "direction",
                Enum(DIRECTIONS),
                "Filter by direction",
            ))
            .arg(Flag("--direction", "direction")),
        Op::new(
            "atxp_phone_read_call",
            "Read a call transcript and summary by call ID. Free to call.",
            "phone read-call",
        )
        .param(ParamSpec::required("call_id", String, "The call ID to read"))
        .arg(Positional("call_id")),
        Op::new(
            "atxp_phone_search",
            "Search SMS messages and call history. Free to call.",
            "phone search",
        )
        .param(ParamSpec::required("query", String, "Search query"))
        .arg(Positional("query")),
    ]
}

fn contacts() -> Vec<Op> {
    vec![
        Op::new(
            "atxp_contacts_add",
            "Add a new contact to the local contacts database. Free to call.",
            "contacts add",
        )
        .param(ParamSpec::required("name", String, "Contact name"))
        .param(ParamSpec::optional("phone", StringList, "Phone number(s)"))
        .param(ParamSpec::optional("email", StringList, "Email address(es)"))
        .param(ParamSpec::optional("notes", String, "Notes about the contact"))
        .arg(Flag("--name", "name"))
        .arg(Repeated("--phone", "phone"))
        .arg(Repeated("--email", "email"))
        .arg(Flag("--notes", "notes")),
        Op::new("atxp_contacts_list", "List all contacts. Free to call.", "contacts list"),
        Op::new(
            "atxp_contacts_show",
            "Show full details for a contact by ID. Free to call.",
            "contacts show",
        )
        .param(ParamSpec::required("id", String, "Contact ID"))
        .arg(Positional("id")),
        Op::new(
            "atxp_contacts_edit",
            "Update a contact's fields. Free to call.",
            "contacts edit",
        )
        .param(ParamSpec::required("id", String, "Contact ID to edit"))
        .param(ParamSpec::optional("name", String, "New name"))
        .param(ParamSpec::optional("phone", StringList, "New phone number(s)"))
        .param(ParamSpec::optional("email", StringList, "New email address(es)"))
        .param(ParamSpec::optional("notes", String, "New notes"))
        .arg(Positional("id"))
        .arg(Flag("--name", "name"))
        .arg(Repeated("--phone", "phone"))
        .arg(Repeated("--email", "email"))
        .arg(Flag("--notes", "notes")),
        Op::new(
            "atxp_contacts_remove",
            "Delete a contact by ID. Free to call.",
            "contacts remove",
        )
        .param(ParamSpec::required("id", String, "Contact ID to remove"))
        .arg(Positional("id")),
        Op::new(
            "atxp_contacts_search",
            "Search contacts by name, phone, or email. Case-insensitive. Free to call.",
            "contacts search",
        )
        .param(ParamSpec::required("query", String, "Search query"))
        .arg(Positional("query")),
        Op::new(
            "atxp_contacts_push",
            "Back up local contacts to the ATXP server. Free to call.",
            "contacts push",
        ),
        Op::new(
            "atxp_contacts_pull",
            "Restore contacts from the ATXP server. Free to call.",
            "contacts pull",
        ),
    ]
}

fn agents() -> Vec<Op> {
    vec![
        Op::new(
            "atxp_agent_create",
            "Create a new agent account under the logged-in human developer. Requires prior login.",
            "agent create",
        ),
        Op::new(
            "atxp_agent_list",
            "List all agents created by the logged-in account.",
            "agent list",
        ),
    ]
}
