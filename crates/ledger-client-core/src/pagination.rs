use tracing::{debug, warn};

use crate::error::{ClientError, PaginationExhausted, ParseError};
use crate::request::{RequestDescriptor, PARAM_START};
use crate::transport::Transport;
use crate::translate::{check_status, decode_body};

/// Response header carrying the cursor for the next page.
pub const CURSOR_HEADER: &str = "x-aptos-cursor";

// ==============================================================================
// Pagination State
// ==============================================================================

/// Bookkeeping for one walk; dropped when the walk returns.
#[derive(Debug, Default)]
struct PaginationState {
    items: Vec<serde_json::Value>,
    cursor: Option<String>,
    requests: usize,
}

// ==============================================================================
// Cursor Walker
// ==============================================================================

/// Fetch every page of a cursor-paginated listing, in server order.
///
/// Each page must decode as a JSON array. The next request is the previous
/// one with the cursor header value substituted into `start`. The walk ends
/// successfully when the cursor is absent or empty, or when it repeats the
/// cursor just used. A cursor that is not valid text is a [`ParseError`]. It fails with [`PaginationExhausted`] once `max_requests`
/// requests have been issued without reaching either end condition. Any
/// transport, API or parse failure aborts the walk and is returned unchanged.
///
/// Requests are strictly sequential: page `k + 1` is only requested after
/// page `k` has been consumed.
pub async fn walk_cursor_pages(
    transport: &dyn Transport,
    first: RequestDescriptor,
    max_requests: usize,
) -> Result<Vec<serde_json::Value>, ClientError> {
    let mut state = PaginationState {
        cursor: first.param(PARAM_START).map(str::to_owned),
        ..PaginationState::default()
    };
    let mut request = first;

    loop {
        if state.requests >= max_requests {
            warn!(
                requests = state.requests,
                items = state.items.len(),
                "pagination safety bound reached"
            );
            return Err(PaginationExhausted {
                requests: state.requests,
                last_cursor: state.cursor.unwrap_or_default(),
                partial: state.items,
            }
            .into());
        }

        let envelope = check_status(transport.execute(&request).await?)?;
        let page: Vec<serde_json::Value> = decode_body(&envelope)?;
        state.requests += 1;
        debug!(
            page = state.requests,
            page_items = page.len(),
            cursor = state.cursor.as_deref().unwrap_or(""),
            "fetched page"
        );
        state.items.extend(page);

        let next = match envelope.headers.get(CURSOR_HEADER) {
            None => return Ok(state.items),
            Some(value) => value.to_str().map_err(|e| {
                ParseError::new(
                    envelope.status,
                    envelope.url.clone(),
                    CURSOR_HEADER,
                    e.to_string(),
                )
            })?,
        };
        if next.is_empty() {
            return Ok(state.items);
        }
        if state.cursor.as_deref() == Some(next) {
            warn!(cursor = next, "server repeated the cursor; stopping pagination");
            return Ok(state.items);
        }

        request = request.with_param(PARAM_START, next);
        state.cursor = Some(next.to_owned());
    }
}
