//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Host the single board session and expose one function per user intent.
//! - Hand snapshots and derived views to Dart as JSON text.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Intents are serialized through one process-wide session lock, so every
//!   persisted snapshot is causally after its predecessor.
//! - Stale ids are not failures: they answer `ok = true` without a change.

use chrono::{Local, NaiveDate};
use log::warn;
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use taskboard_core::model::board::CardPatch;
use taskboard_core::model::catalog::Label;
use taskboard_core::mutation::{board_ops, card_ops, catalog_ops, checklist_ops};
use taskboard_core::{
    archived_cards, boards_matching, core_version as core_version_inner, filter_board,
    init_logging as init_logging_inner, move_card, move_list, ping as ping_inner, BoardSession,
    CardStatus, DropLocation, DueBucket, FilterSpec, SessionError, SqliteSnapshotStore,
    ValidationError,
};

const STORE_DB_FILE_NAME: &str = "taskboard.sqlite3";
const STORE_PATH_ENV: &str = "TASKBOARD_DB_PATH";

static STORE_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<BoardSession<SqliteSnapshotStore>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the SQLite file backing the board session.
///
/// Must run before the first board call; afterwards only the already
/// resolved path is accepted. Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "store path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let resolved = STORE_PATH.get_or_init(|| requested.clone());
    if *resolved == requested {
        String::new()
    } else {
        format!(
            "store path already resolved to `{}`; refusing to switch to `{}`",
            resolved.display(),
            requested.display()
        )
    }
}

/// Action response envelope for board intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether the intent was accepted and persisted.
    pub ok: bool,
    /// Id of the created entity, when the intent creates one.
    pub entity_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl BoardActionResponse {
    fn success(message: impl Into<String>, entity_id: Option<String>) -> Self {
        Self {
            ok: true,
            entity_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entity_id: None,
            message: message.into(),
        }
    }
}

/// JSON payload envelope for snapshot and view queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardJsonResponse {
    pub ok: bool,
    /// Serialized payload; empty on failure.
    pub json: String,
    pub message: String,
}

impl BoardJsonResponse {
    fn from_result(op: &str, result: Result<String, String>) -> Self {
        match result {
            Ok(json) => Self {
                ok: true,
                json,
                message: String::new(),
            },
            Err(err) => Self {
                ok: false,
                json: String::new(),
                message: format!("{op} failed: {err}"),
            },
        }
    }
}

/// Returns the current snapshot as JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn snapshot_json() -> BoardJsonResponse {
    let result = with_session(|session| to_json(session.snapshot()));
    BoardJsonResponse::from_result("snapshot_json", result)
}

/// Re-reads the stored snapshot and returns it as JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn snapshot_reload() -> BoardJsonResponse {
    let result = with_session(|session| {
        session.reload();
        to_json(session.snapshot())
    });
    BoardJsonResponse::from_result("snapshot_reload", result)
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_create(title: String, background: Option<String>) -> BoardActionResponse {
    created(
        "board_create",
        "Board created.",
        with_session(|session| {
            apply_with(session, |snapshot| {
                let (next, board_id) =
                    board_ops::create_board(snapshot, &title, background.as_deref());
                (next, Some(board_id))
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_rename(board_id: String, title: String) -> BoardActionResponse {
    applied(
        "board_rename",
        with_session(|session| {
            apply(session, |snapshot| {
                board_ops::rename_board(snapshot, &board_id, &title)
            })
        }),
    )
}

/// Sets or clears (`None`/blank) the board background.
#[flutter_rust_bridge::frb(sync)]
pub fn board_set_background(board_id: String, background: Option<String>) -> BoardActionResponse {
    applied(
        "board_set_background",
        with_session(|session| {
            apply(session, |snapshot| {
                board_ops::set_board_background(snapshot, &board_id, background.as_deref())
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_delete(board_id: String) -> BoardActionResponse {
    applied(
        "board_delete",
        with_session(|session| {
            apply(session, |snapshot| board_ops::delete_board(snapshot, &board_id))
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_create(board_id: String, title: String) -> BoardActionResponse {
    created(
        "list_create",
        "List created.",
        with_session(|session| {
            apply_with(session, |snapshot| {
                board_ops::create_list(snapshot, &board_id, &title)
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_rename(list_id: String, title: String) -> BoardActionResponse {
    applied(
        "list_rename",
        with_session(|session| {
            apply(session, |snapshot| {
                board_ops::rename_list(snapshot, &list_id, &title)
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_delete(list_id: String) -> BoardActionResponse {
    applied(
        "list_delete",
        with_session(|session| {
            apply(session, |snapshot| board_ops::delete_list(snapshot, &list_id))
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn card_create(list_id: String, title: String) -> BoardActionResponse {
    created(
        "card_create",
        "Card created.",
        with_session(|session| {
            apply_with(session, |snapshot| {
                card_ops::create_card(snapshot, &list_id, &title)
            })
        }),
    )
}

/// Applies a partial card update encoded as JSON.
///
/// Input semantics:
/// - `patch_json`: object with any of `title`, `description`, `dueDate`
///   (`null` clears), `labels`, `members`, `checklists`, `archived`.
///   Unknown keys are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn card_update(card_id: String, patch_json: String) -> BoardActionResponse {
    let patch = match serde_json::from_str::<CardPatch>(&patch_json) {
        Ok(patch) => patch,
        Err(err) => {
            let err = ValidationError::MalformedPatch(err.to_string());
            return BoardActionResponse::failure(format!("card_update failed: {err}"));
        }
    };
    applied(
        "card_update",
        with_session(|session| {
            try_apply(session, |snapshot| {
                card_ops::update_card(snapshot, &card_id, &patch)
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn card_archive(card_id: String) -> BoardActionResponse {
    applied(
        "card_archive",
        with_session(|session| {
            apply(session, |snapshot| card_ops::archive_card(snapshot, &card_id))
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn card_restore(card_id: String) -> BoardActionResponse {
    applied(
        "card_restore",
        with_session(|session| {
            apply(session, |snapshot| card_ops::restore_card(snapshot, &card_id))
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn card_toggle_label(card_id: String, label_id: String) -> BoardActionResponse {
    applied(
        "card_toggle_label",
        with_session(|session| {
            apply(session, |snapshot| {
                card_ops::toggle_card_label(snapshot, &card_id, &label_id)
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn card_toggle_member(card_id: String, member_id: String) -> BoardActionResponse {
    applied(
        "card_toggle_member",
        with_session(|session| {
            apply(session, |snapshot| {
                card_ops::toggle_card_member(snapshot, &card_id, &member_id)
            })
        }),
    )
}

/// Adds a label to the global catalog.
///
/// Input semantics:
/// - `color`: palette name (`green`, `red`, ...) or `#rgb`/`#rrggbb`.
#[flutter_rust_bridge::frb(sync)]
pub fn label_create(name: String, color: String) -> BoardActionResponse {
    let color = match catalog_ops::parse_label_color(&color) {
        Ok(color) => color,
        Err(err) => return BoardActionResponse::failure(format!("label_create failed: {err}")),
    };
    let label = Label::new(name, color);
    let label_id = label.id.clone();
    let result = with_session(|session| {
        try_apply(session, |snapshot| catalog_ops::create_label(snapshot, &label))
    });
    created("label_create", "Label created.", result.map(|()| Some(label_id)))
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_add(card_id: String, title: String) -> BoardActionResponse {
    created(
        "checklist_add",
        "Checklist added.",
        with_session(|session| {
            apply_with(session, |snapshot| {
                checklist_ops::add_checklist(snapshot, &card_id, &title)
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_rename(card_id: String, checklist_id: String, title: String) -> BoardActionResponse {
    applied(
        "checklist_rename",
        with_session(|session| {
            apply(session, |snapshot| {
                checklist_ops::rename_checklist(snapshot, &card_id, &checklist_id, &title)
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_remove(card_id: String, checklist_id: String) -> BoardActionResponse {
    applied(
        "checklist_remove",
        with_session(|session| {
            apply(session, |snapshot| {
                checklist_ops::remove_checklist(snapshot, &card_id, &checklist_id)
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_item_add(card_id: String, checklist_id: String, text: String) -> BoardActionResponse {
    created(
        "checklist_item_add",
        "Checklist item added.",
        with_session(|session| {
            apply_with(session, |snapshot| {
                checklist_ops::add_checklist_item(snapshot, &card_id, &checklist_id, &text)
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_item_edit(
    card_id: String,
    checklist_id: String,
    item_id: String,
    text: String,
) -> BoardActionResponse {
    applied(
        "checklist_item_edit",
        with_session(|session| {
            apply(session, |snapshot| {
                checklist_ops::edit_checklist_item(snapshot, &card_id, &checklist_id, &item_id, &text)
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_item_toggle(
    card_id: String,
    checklist_id: String,
    item_id: String,
) -> BoardActionResponse {
    applied(
        "checklist_item_toggle",
        with_session(|session| {
            apply(session, |snapshot| {
                checklist_ops::toggle_checklist_item(snapshot, &card_id, &checklist_id, &item_id)
            })
        }),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_item_remove(
    card_id: String,
    checklist_id: String,
    item_id: String,
) -> BoardActionResponse {
    applied(
        "checklist_item_remove",
        with_session(|session| {
            apply(session, |snapshot| {
                checklist_ops::remove_checklist_item(snapshot, &card_id, &checklist_id, &item_id)
            })
        }),
    )
}

/// Applies a list drag result inside one board.
///
/// `destination_index = None` means the list was dropped outside the board.
#[flutter_rust_bridge::frb(sync)]
pub fn list_move(
    board_id: String,
    source_index: u32,
    destination_index: Option<u32>,
) -> BoardActionResponse {
    applied(
        "list_move",
        with_session(|session| {
            apply(session, |snapshot| {
                move_list(
                    snapshot,
                    &board_id,
                    source_index as usize,
                    destination_index.map(|index| index as usize),
                )
            })
        }),
    )
}

/// Applies a card drag result within one list or across two lists.
///
/// A missing destination list or index means the card was dropped outside
/// any list.
#[flutter_rust_bridge::frb(sync)]
pub fn card_move(
    source_list_id: String,
    source_index: u32,
    destination_list_id: Option<String>,
    destination_index: Option<u32>,
) -> BoardActionResponse {
    let source = DropLocation::new(source_list_id, source_index as usize);
    let destination = destination_list_id
        .zip(destination_index)
        .map(|(list_id, index)| DropLocation::new(list_id, index as usize));
    applied(
        "card_move",
        with_session(|session| {
            apply(session, |snapshot| {
                move_card(snapshot, &source, destination.as_ref())
            })
        }),
    )
}

/// Returns a filtered view of one board as JSON.
///
/// Input semantics:
/// - `keyword`: case-insensitive title substring; blank disables it.
/// - `status`: `complete|incomplete`, `None` disables it.
/// - `due`: `overdue|nextday|nextweek|nextmonth`, `None` disables it.
/// - `today`: `YYYY-MM-DD`; `None` uses the local calendar date.
#[flutter_rust_bridge::frb(sync)]
pub fn board_filter_json(
    board_id: String,
    keyword: String,
    member_ids: Vec<String>,
    label_ids: Vec<String>,
    status: Option<String>,
    due: Option<String>,
    today: Option<String>,
) -> BoardJsonResponse {
    let result = parse_filter(keyword, member_ids, label_ids, status, due, today).and_then(
        |(spec, today)| {
            with_session(|session| {
                match filter_board(session.snapshot(), &board_id, &spec, today) {
                    Some(view) => to_json(&view),
                    None => Err(format!("board not found: {board_id}")),
                }
            })
        },
    );
    BoardJsonResponse::from_result("board_filter_json", result)
}

/// Returns the boards whose title contains `query` as JSON, in board
/// order. A blank query returns every board.
#[flutter_rust_bridge::frb(sync)]
pub fn board_search_json(query: String) -> BoardJsonResponse {
    let result = with_session(|session| to_json(&boards_matching(session.snapshot(), &query)));
    BoardJsonResponse::from_result("board_search_json", result)
}

/// Returns the archived cards of one board as JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn board_archived_json(board_id: String) -> BoardJsonResponse {
    let result =
        with_session(|session| to_json(&archived_cards(session.snapshot(), &board_id)));
    BoardJsonResponse::from_result("board_archived_json", result)
}

/// Returns checklist badge data for one card as JSON:
/// `{ done, total, checklists: [{ id, done, total, percent }] }`.
#[flutter_rust_bridge::frb(sync)]
pub fn card_checklist_progress_json(card_id: String) -> BoardJsonResponse {
    let result = with_session(|session| {
        let Some(card) = session.snapshot().card(&card_id) else {
            return Err(format!("card not found: {card_id}"));
        };
        let (done, total) = card.checklist_totals();
        let checklists = card
            .checklists
            .iter()
            .map(|checklist| {
                json!({
                    "id": checklist.id,
                    "done": checklist.done_count(),
                    "total": checklist.items.len(),
                    "percent": checklist.progress_percent(),
                })
            })
            .collect::<Vec<_>>();
        to_json(&json!({ "done": done, "total": total, "checklists": checklists }))
    });
    BoardJsonResponse::from_result("card_checklist_progress_json", result)
}

fn parse_filter(
    keyword: String,
    member_ids: Vec<String>,
    label_ids: Vec<String>,
    status: Option<String>,
    due: Option<String>,
    today: Option<String>,
) -> Result<(FilterSpec, NaiveDate), String> {
    let status = match status.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => {
            Some(CardStatus::parse(raw).ok_or_else(|| format!("unsupported status `{raw}`"))?)
        }
        None => None,
    };
    let due = match due.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(DueBucket::parse(raw).ok_or_else(|| format!("unsupported due bucket `{raw}`"))?),
        None => None,
    };
    let today = match today.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|err| format!("invalid today `{raw}`: {err}"))?,
        None => Local::now().date_naive(),
    };
    let spec = FilterSpec {
        keyword,
        members: member_ids.into_iter().collect(),
        labels: label_ids.into_iter().collect(),
        status,
        due,
    };
    Ok((spec, today))
}

fn resolve_store_path() -> PathBuf {
    STORE_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn lock_session() -> MutexGuard<'static, Option<BoardSession<SqliteSnapshotStore>>> {
    SESSION.lock().unwrap_or_else(|poisoned| {
        warn!("event=session_lock module=ffi status=recovered reason=poisoned");
        PoisonError::into_inner(poisoned)
    })
}

fn with_session<T>(
    f: impl FnOnce(&mut BoardSession<SqliteSnapshotStore>) -> Result<T, String>,
) -> Result<T, String> {
    let mut guard = lock_session();
    if guard.is_none() {
        let store = SqliteSnapshotStore::open(resolve_store_path())
            .map_err(|err| format!("board store open failed: {err}"))?;
        *guard = Some(BoardSession::open(store));
    }
    match guard.as_mut() {
        Some(session) => f(session),
        None => Err("board session unavailable".to_string()),
    }
}

fn apply(
    session: &mut BoardSession<SqliteSnapshotStore>,
    intent: impl FnOnce(&taskboard_core::Snapshot) -> taskboard_core::Snapshot,
) -> Result<Option<String>, String> {
    session
        .apply(intent)
        .map(|()| None)
        .map_err(session_error_message)
}

fn apply_with(
    session: &mut BoardSession<SqliteSnapshotStore>,
    intent: impl FnOnce(&taskboard_core::Snapshot) -> (taskboard_core::Snapshot, Option<String>),
) -> Result<Option<String>, String> {
    session.apply_with(intent).map_err(session_error_message)
}

fn try_apply(
    session: &mut BoardSession<SqliteSnapshotStore>,
    intent: impl FnOnce(&taskboard_core::Snapshot) -> Result<taskboard_core::Snapshot, ValidationError>,
) -> Result<(), String> {
    session.try_apply(intent).map_err(session_error_message)
}

fn session_error_message(err: SessionError) -> String {
    match err {
        SessionError::Validation(err) => err.to_string(),
        SessionError::Store(err) => format!("changes kept in memory but not saved: {err}"),
    }
}

fn applied<T>(op: &str, result: Result<T, String>) -> BoardActionResponse {
    match result {
        Ok(_) => BoardActionResponse::success("Saved.", None),
        Err(err) => BoardActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn created(op: &str, message: &str, result: Result<Option<String>, String>) -> BoardActionResponse {
    match result {
        Ok(Some(entity_id)) => BoardActionResponse::success(message, Some(entity_id)),
        Ok(None) => BoardActionResponse::success("Target not found; nothing created.", None),
        Err(err) => BoardActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|err| format!("encoding failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{
        board_archived_json, board_create, board_filter_json, board_search_json, card_archive,
        card_checklist_progress_json, card_create, card_move, card_update, checklist_add,
        checklist_item_add, checklist_item_toggle,
        configure_store_path, core_version, init_logging, label_create, list_create, list_move,
        list_rename, ping, resolve_store_path, snapshot_json,
    };
    use rusqlite::OptionalExtension;
    use serde_json::Value;
    use taskboard_core::db::open_db;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_store_path_only_accepts_the_resolved_path() {
        assert!(!configure_store_path("  ".to_string()).is_empty());

        let resolved = resolve_store_path();
        assert!(configure_store_path(resolved.display().to_string()).is_empty());
        let error = configure_store_path(format!("{}.other", resolved.display()));
        assert!(error.contains("refusing to switch"));
    }

    #[test]
    fn created_board_is_persisted_in_kv_store() {
        let board = board_create("FFI Board".to_string(), Some("#0079bf".to_string()));
        assert!(board.ok, "{}", board.message);
        let board_id = board.entity_id.expect("board id");

        let conn = open_db(resolve_store_path()).expect("open db");
        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = 'trello_clone_data_v1';",
                [],
                |row| row.get(0),
            )
            .optional()
            .expect("query snapshot row");
        assert!(stored.expect("snapshot row").contains(&board_id));

        let snapshot = snapshot_json();
        assert!(snapshot.ok, "{}", snapshot.message);
        assert!(snapshot.json.contains(&board_id));
    }

    #[test]
    fn stale_ids_succeed_without_creating_anything() {
        let list = list_create("no-such-board".to_string(), "Later".to_string());
        assert!(list.ok, "{}", list.message);
        assert_eq!(list.entity_id, None);

        let renamed = list_rename("no-such-list".to_string(), "x".to_string());
        assert!(renamed.ok, "{}", renamed.message);
    }

    #[test]
    fn card_update_rejects_malformed_and_dangling_patches() {
        let board_id = board_create("Patch Board".to_string(), None)
            .entity_id
            .expect("board id");
        let list_id = list_create(board_id, "Inbox".to_string())
            .entity_id
            .expect("list id");
        let card_id = card_create(list_id, "Patch me".to_string())
            .entity_id
            .expect("card id");

        let malformed = card_update(card_id.clone(), "{\"title\":".to_string());
        assert!(!malformed.ok);
        assert!(malformed.message.contains("malformed card patch"));

        let unknown = card_update(card_id.clone(), "{\"colour\":\"red\"}".to_string());
        assert!(!unknown.ok);

        let dangling = card_update(card_id.clone(), "{\"labels\":[\"no-such-label\"]}".to_string());
        assert!(!dangling.ok);
        assert!(dangling.message.contains("label not found"));

        let ok = card_update(card_id, "{\"title\":\"Patched\",\"dueDate\":\"2024-05-01\"}".to_string());
        assert!(ok.ok, "{}", ok.message);
    }

    #[test]
    fn label_create_validates_color() {
        let bad = label_create("urgent".to_string(), "#12".to_string());
        assert!(!bad.ok);

        let good = label_create("urgent".to_string(), "red".to_string());
        assert!(good.ok, "{}", good.message);
        assert!(good.entity_id.is_some());
    }

    #[test]
    fn moves_filter_and_archive_flow() {
        let board_id = board_create("Flow Board".to_string(), None)
            .entity_id
            .expect("board id");
        let doing = list_create(board_id.clone(), "Doing".to_string())
            .entity_id
            .expect("list id");
        let first = card_create(doing.clone(), "Write flow test".to_string())
            .entity_id
            .expect("card id");
        let second = card_create(doing.clone(), "Review flow test".to_string())
            .entity_id
            .expect("card id");

        assert!(card_move(doing.clone(), 1, Some(doing.clone()), Some(0)).ok);
        assert!(card_move(doing.clone(), 0, None, None).ok);
        assert!(list_move(board_id.clone(), 1, Some(0)).ok);

        let checklist_id = checklist_add(first.clone(), String::new())
            .entity_id
            .expect("checklist id");
        let item_id = checklist_item_add(first.clone(), checklist_id.clone(), "step".to_string())
            .entity_id
            .expect("item id");
        assert!(checklist_item_toggle(first.clone(), checklist_id, item_id).ok);

        let progress = card_checklist_progress_json(first.clone());
        assert!(progress.ok, "{}", progress.message);
        let progress: Value = serde_json::from_str(&progress.json).expect("progress json");
        assert_eq!(progress["done"], 1);
        assert_eq!(progress["checklists"][0]["percent"], 100);

        let complete = board_filter_json(
            board_id.clone(),
            "flow".to_string(),
            Vec::new(),
            Vec::new(),
            Some("complete".to_string()),
            None,
            Some("2024-01-01".to_string()),
        );
        assert!(complete.ok, "{}", complete.message);
        let view: Value = serde_json::from_str(&complete.json).expect("view json");
        let lists = view["lists"].as_array().expect("lists");
        assert_eq!(lists[0]["title"], "Doing");
        let cards = lists[0]["cards"].as_array().expect("cards");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0]["id"], first.as_str());

        assert!(card_archive(second.clone()).ok);
        let archived = board_archived_json(board_id.clone());
        assert!(archived.ok, "{}", archived.message);
        assert!(archived.json.contains(&second));

        let bad_bucket = board_filter_json(
            board_id,
            String::new(),
            Vec::new(),
            Vec::new(),
            None,
            Some("someday".to_string()),
            None,
        );
        assert!(!bad_bucket.ok);
    }

    #[test]
    fn board_search_matches_titles_case_insensitively() {
        let board = board_create("Quarterly Harvest Plan".to_string(), None);
        assert!(board.ok, "{}", board.message);
        let board_id = board.entity_id.expect("board id");

        let hits = board_search_json("harvest PLAN".to_string());
        assert!(hits.ok, "{}", hits.message);
        let boards: Value = serde_json::from_str(&hits.json).expect("json");
        assert!(boards
            .as_array()
            .expect("array")
            .iter()
            .any(|board| board["id"] == board_id.as_str()));

        let misses = board_search_json("no board carries this title".to_string());
        assert_eq!(misses.json, "[]");
    }
}
