use std::sync::Arc;

use msgdev_buffer::{ByteChannel, MessageBuffer, Session, CAPACITY};
use proptest::prelude::*;

fn fresh_session() -> Session {
    Session::new(ByteChannel::new(Arc::new(MessageBuffer::new())))
}

proptest! {
    #[test]
    fn write_then_drain_reproduces_input(
        input in proptest::collection::vec(1u8..=255, 0..=CAPACITY),
        chunk in 1usize..=CAPACITY + 10,
    ) {
        let mut session = fresh_session();
        prop_assert_eq!(session.write_message(&input), input.len());
        prop_assert_eq!(session.read_to_end_of_message(chunk), input);
        prop_assert_eq!(session.cursor().offset(), 0);
    }

    #[test]
    fn oversized_write_keeps_first_capacity_bytes(
        input in proptest::collection::vec(1u8..=255, CAPACITY + 1..=CAPACITY * 3),
        chunk in 1usize..=CAPACITY,
    ) {
        let mut session = fresh_session();
        prop_assert_eq!(session.write_message(&input), CAPACITY);
        prop_assert_eq!(session.read_to_end_of_message(chunk), &input[..CAPACITY]);
    }

    #[test]
    fn read_stops_at_first_zero(
        head in proptest::collection::vec(1u8..=255, 0..40),
        tail in proptest::collection::vec(any::<u8>(), 0..39),
    ) {
        let mut input = head.clone();
        input.push(0);
        input.extend_from_slice(&tail);

        let mut session = fresh_session();
        session.write_message(&input);
        prop_assert_eq!(session.read_to_end_of_message(CAPACITY), head);
    }
}
