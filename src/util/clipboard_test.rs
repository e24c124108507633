use super::*;

#[test]
fn mark_sets_copied_id() {
    let mut ack = CopyAck::default();
    ack.mark("a");
    assert!(ack.is_copied("a"));
    assert!(!ack.is_copied("b"));
}

#[test]
fn expire_with_current_ticket_clears() {
    let mut ack = CopyAck::default();
    let ticket = ack.mark("a");
    ack.expire(ticket);
    assert_eq!(ack.copied_id, None);
}

#[test]
fn stale_expiry_keeps_newer_copy() {
    let mut ack = CopyAck::default();
    let first = ack.mark("a");
    let second = ack.mark("b");
    ack.expire(first);
    assert!(ack.is_copied("b"));
    ack.expire(second);
    assert_eq!(ack.copied_id, None);
}

#[test]
fn qr_file_name_uses_link_id() {
    assert_eq!(qr_file_name("65f0c2"), "qr-65f0c2.png");
}

#[test]
fn reset_window_is_two_seconds() {
    assert_eq!(COPY_RESET_MS, 2_000);
}
