//! Per-operation tracing events. No subscriber is installed here; the
//! embedding application decides where events go.

/// One completed table operation: `op` on `target`, producing or leaving
/// `rows` rows.
#[cfg(feature = "tracing")]
pub fn record_op(op: &'static str, target: &str, rows: usize) {
    let span = tracing::trace_span!("tabula_op", op);
    let _enter = span.enter();
    tracing::debug!(target_tables = %target, rows, "{op} done");
}

#[cfg(not(feature = "tracing"))]
pub fn record_op(_op: &'static str, _target: &str, _rows: usize) {}
