use crate::engine::core::read::aggregate::arena::ProcessorArena;
use crate::engine::core::read::aggregate::row_select::RowSelectProcessor;

#[test]
fn handles_are_dense_and_stable_across_pages() {
    let mut arena: ProcessorArena<Vec<u32>> = ProcessorArena::new(2);
    let handles: Vec<_> = (0..5).map(|_| arena.alloc()).collect();

    assert_eq!(
        handles.iter().map(|h| h.index()).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );
    for (i, h) in handles.iter().enumerate() {
        arena.get_mut(*h).push(i as u32);
    }
    for (i, h) in handles.iter().enumerate() {
        assert_eq!(arena.get(*h), &vec![i as u32]);
    }
    assert_eq!(arena.len(), 5);
}

#[test]
fn bytes_allocated_grows_per_page() {
    let mut arena: ProcessorArena<RowSelectProcessor> = ProcessorArena::new(4);
    assert!(arena.is_empty());
    assert_eq!(arena.bytes_allocated(), 0);

    arena.alloc();
    let one_page = arena.bytes_allocated();
    assert_eq!(
        one_page,
        4 * std::mem::size_of::<RowSelectProcessor>()
    );

    for _ in 0..3 {
        arena.alloc();
    }
    assert_eq!(arena.bytes_allocated(), one_page);

    arena.alloc();
    assert_eq!(arena.bytes_allocated(), 2 * one_page);
}

#[test]
fn take_and_alloc_with_move_processors_between_arenas() {
    let mut src: ProcessorArena<String> = ProcessorArena::new(8);
    let mut dst: ProcessorArena<String> = ProcessorArena::new(8);
    let h = src.alloc_with("state".to_string());

    let moved = dst.alloc_with(src.take(h));
    assert_eq!(dst.get(moved), "state");
    assert_eq!(src.get(h), "");
}

#[test]
fn zero_page_size_is_clamped() {
    let mut arena: ProcessorArena<u8> = ProcessorArena::new(0);
    let a = arena.alloc_with(1);
    let b = arena.alloc_with(2);
    assert_eq!((*arena.get(a), *arena.get(b)), (1, 2));
}
