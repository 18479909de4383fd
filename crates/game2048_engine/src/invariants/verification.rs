//! Kani proof harnesses for line resolution.
//!
//! Bounded proofs over every line of tiles up to 2^11.

#[cfg(kani)]
mod proofs {
    use crate::rules::resolve_line;
    use crate::{Line, SIZE, Tile, TileIdCounter};

    fn arbitrary_line(ids: &mut TileIdCounter) -> Line {
        let exponents: [u8; SIZE] = kani::any();
        exponents.map(|e| {
            kani::assume(e <= 11);
            (e != 0).then(|| Tile::settled(1u32 << e, ids.next_id()))
        })
    }

    /// Proves: resolution never creates tiles and merges account for the loss.
    #[kani::proof]
    #[kani::unwind(6)]
    fn verify_merges_account_for_count() {
        let mut ids = TileIdCounter::default();
        let line = arbitrary_line(&mut ids);
        let before = line.iter().flatten().count();

        let out = resolve_line(&line, &mut ids);
        let after = out.cells.iter().flatten().count();

        assert!(after + out.merges == before);
        assert!(out.merges > 0 || out.score == 0);
    }

    /// Proves: output is always a dense prefix.
    #[kani::proof]
    #[kani::unwind(6)]
    fn verify_output_is_compacted() {
        let mut ids = TileIdCounter::default();
        let line = arbitrary_line(&mut ids);
        let out = resolve_line(&line, &mut ids);

        let first_empty = out.cells.iter().position(Option::is_none).unwrap_or(SIZE);
        assert!(out.cells[first_empty..].iter().all(Option::is_none));
    }
}
