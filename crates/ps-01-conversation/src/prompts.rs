//! Operator-facing texts and menus.

use crate::domain::{SessionState, TransferDraft, ValidationRules};
use crate::error::ValidationError;
use crate::ports::outbound::{BroadcastReceipt, MenuOption};
use shared_types::{format_units, to_checksum, AssetTable, GWEI_DECIMALS};

pub const EXPLORER_TX_URL: &str = "https://etherscan.io/tx/";

pub fn welcome() -> String {
    "Welcome to Pending Sender! 🤖\n\n\
     This bot helps you create and manage token transfers.\n\n\
     Available Commands:\n\
     /start - Show this welcome message\n\
     /transaction - Create a new transfer\n\
     /status - Check pending transfers\n\
     /history - View transfer history\n\
     /cancel_pending - Replace the oldest pending transfer\n\
     /help - Show help information\n\
     /cancel - Cancel current operation"
        .to_string()
}

pub fn help() -> String {
    "📖 Pending Sender Help\n\n\
     Commands:\n\
     /start - Initialize bot and show main menu\n\
     /transaction - Start new transfer\n\
     /status - Check pending transfers\n\
     /history - View transfer history\n\
     /cancel_pending - Cancel the oldest pending transfer\n\
     /clear - Forget the current session and pending transfers\n\
     /help - Show this help message\n\
     /cancel - Cancel current operation\n\n\
     Transfer Process:\n\
     1. Start with /transaction\n\
     2. Enter Infura URL\n\
     3. Provide private key\n\
     4. Select token\n\
     5. Enter target address\n\
     6. Specify amount\n\
     7. Set gas price\n\
     8. Confirm transfer\n\n\
     Security Tips:\n\
     • Never share your private keys\n\
     • Verify all transfer details\n\
     • Check gas prices before confirming\n\
     • Keep your session active"
        .to_string()
}

pub fn main_menu() -> Vec<Vec<MenuOption>> {
    vec![
        vec![
            MenuOption::new("🔄 New Transaction", "menu:transaction"),
            MenuOption::new("📊 Status", "menu:status"),
        ],
        vec![
            MenuOption::new("📜 History", "menu:history"),
            MenuOption::new("❓ Help", "menu:help"),
        ],
    ]
}

/// Two assets per row, labelled `Name (SYMBOL)`.
pub fn asset_menu(assets: &AssetTable) -> Vec<Vec<MenuOption>> {
    let buttons: Vec<MenuOption> = assets
        .iter()
        .map(|a| MenuOption::new(a.label(), format!("token:{}", a.symbol)))
        .collect();
    buttons.chunks(2).map(|row| row.to_vec()).collect()
}

pub fn confirm_menu() -> Vec<Vec<MenuOption>> {
    vec![vec![
        MenuOption::new("✅ Confirm", "confirm:yes"),
        MenuOption::new("❌ Cancel", "confirm:no"),
    ]]
}

/// Prompt for the field collected in `state`.
pub fn prompt_for(state: SessionState, rules: &ValidationRules) -> String {
    match state {
        SessionState::AwaitingEndpoint => format!(
            "Please enter your Infura URL:\nFormat: {}your-project-id",
            rules.endpoint_prefix()
        ),
        SessionState::AwaitingKey => {
            "Please enter your private key:\nWarning: Never share your private key with anyone!"
                .to_string()
        }
        SessionState::AwaitingAsset => "Select a token:".to_string(),
        SessionState::AwaitingTarget => "Please enter the target address:".to_string(),
        SessionState::AwaitingAmount => "Enter the amount to send:".to_string(),
        SessionState::AwaitingFee => format!(
            "Enter gas price in Gwei:\nRecommended: {} Gwei for pending transactions",
            rules.fee_floor()
        ),
        SessionState::Idle | SessionState::Completed | SessionState::Cancelled => idle_hint(),
        SessionState::Confirming => "Please confirm the transfer details.".to_string(),
    }
}

pub fn summary(draft: &TransferDraft) -> String {
    format!(
        "📝 Transaction Summary\n\n\
         Token: {}\n\
         Amount: {}\n\
         From: {}\n\
         To: {}\n\
         Gas Price: {} Gwei\n\n\
         Please confirm the transaction details.",
        draft.asset.symbol,
        format_units(draft.amount, draft.asset.decimals),
        to_checksum(&draft.credentials.sender()),
        to_checksum(&draft.target),
        format_units(draft.fee, GWEI_DECIMALS),
    )
}

pub fn rejection(error: &ValidationError) -> String {
    format!("❌ {}. Please try again.", error)
}

pub fn submitted(receipt: &BroadcastReceipt) -> String {
    let mut text = format!(
        "✅ Transaction Submitted\n\n\
         Hash: {:?}\n\
         Nonce: {}\n\
         {}{:?}\n\n\
         It will stay pending at this gas price. Track it with /status, \
         replace it with /cancel_pending.",
        receipt.transfer_id, receipt.sequence_number, EXPLORER_TX_URL, receipt.transfer_id
    );
    for note in &receipt.notes {
        text.push_str("\n\n⚠️ ");
        text.push_str(note);
    }
    text
}

pub fn broadcast_failed(cause: &str) -> String {
    format!(
        "❌ Transaction failed:\n{}\n\nConfirm to retry or cancel to start over.",
        cause
    )
}

pub fn expired() -> String {
    "⚠️ Your session has expired. Please start a new transaction with /transaction".to_string()
}

pub fn operation_cancelled() -> String {
    "❌ Current operation cancelled.\nUse /start to begin a new operation.".to_string()
}

pub fn transfer_cancelled() -> String {
    "❌ Transaction cancelled.\nUse /transaction to start a new one.".to_string()
}

pub fn idle_hint() -> String {
    "Use /transaction to start a new transfer or /help to see all commands.".to_string()
}

pub fn confirm_hint() -> String {
    "Please choose Confirm or Cancel.".to_string()
}

pub fn unknown_command(name: &str) -> String {
    format!("Unknown command /{}. Use /help to see all commands.", name)
}

pub fn unknown_selection() -> String {
    "That option is no longer available.".to_string()
}
