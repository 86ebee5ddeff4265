//! Property tests for the content graph's linked-list invariants.

use novella::frame::Frame;
use novella::graph::ContentGraph;
use novella::types::{FrameId, VOID_FRAME_ID};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize),
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..64).prop_map(Op::Insert),
        (0usize..64).prop_map(Op::Remove),
    ]
}

proptest! {
    /// For any insert/remove sequence, the head-to-tail traversal visits
    /// exactly the live ids in order, the reverse traversal mirrors it, and
    /// ids are never reused.
    #[test]
    fn traversal_always_matches_the_model(ops in prop::collection::vec(op_strategy(), 1..48)) {
        let mut graph = ContentGraph::new();
        let mut model: Vec<FrameId> = Vec::new();
        let mut high_water: FrameId = VOID_FRAME_ID;

        for op in ops {
            match op {
                Op::Insert(k) => {
                    // slot 0 means "insert at head", i.e. after the void id
                    let slot = k % (model.len() + 1);
                    let after = if slot == 0 {
                        VOID_FRAME_ID
                    } else {
                        model[slot - 1]
                    };
                    let fid = graph.insert_after(Frame::empty("p"), after).unwrap();
                    prop_assert!(fid > high_water, "id {} reused below high water {}", fid, high_water);
                    high_water = fid;
                    model.insert(slot, fid);
                }
                Op::Remove(k) => {
                    if model.is_empty() {
                        continue;
                    }
                    let idx = k % model.len();
                    graph.remove(model[idx]).unwrap();
                    model.remove(idx);
                }
            }
        }

        prop_assert_eq!(graph.ordered_ids(), model.clone());
        prop_assert_eq!(graph.len(), model.len());
        prop_assert_eq!(graph.head(), model.first().copied().unwrap_or(VOID_FRAME_ID));
        prop_assert_eq!(graph.tail(), model.last().copied().unwrap_or(VOID_FRAME_ID));

        let mut reversed = Vec::new();
        let mut cursor = graph.tail();
        while cursor != VOID_FRAME_ID {
            reversed.push(cursor);
            cursor = graph.frame(cursor).unwrap().link.prev;
        }
        let mut model_rev = model;
        model_rev.reverse();
        prop_assert_eq!(reversed, model_rev);
    }
}
