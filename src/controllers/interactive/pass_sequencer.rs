use crate::controllers::interactive::data::render_result::RenderResult;

/// Releases work-item results in pass order.
///
/// Results of the pass currently being applied are released as they arrive.
/// Results of later passes are held until every item of all earlier passes
/// has been released.
#[derive(Debug)]
pub struct PassSequencer {
    generation: u64,
    expected: Vec<usize>,
    received: Vec<usize>,
    held: Vec<Vec<RenderResult>>,
    next_pass: usize,
}

impl PassSequencer {
    /// `items_per_pass[i]` is the number of results pass `i` will produce.
    #[must_use]
    pub fn new(generation: u64, items_per_pass: Vec<usize>) -> Self {
        let passes = items_per_pass.len();
        let mut sequencer = Self {
            generation,
            expected: items_per_pass,
            received: vec![0; passes],
            held: vec![Vec::new(); passes],
            next_pass: 0,
        };
        sequencer.advance();
        sequencer
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the pass currently being applied. Equals the pass count once
    /// every pass is complete.
    #[must_use]
    pub fn current_pass(&self) -> usize {
        self.next_pass
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_pass == self.expected.len()
    }

    /// Accepts one result and returns every result that may now be applied,
    /// in order. Results of another generation or an unknown pass are
    /// dropped.
    pub fn accept(&mut self, result: RenderResult) -> Vec<RenderResult> {
        let pass = result.pass as usize;

        if result.generation != self.generation || pass >= self.expected.len() {
            return Vec::new();
        }

        self.received[pass] += 1;

        let mut ready = Vec::new();
        if pass == self.next_pass {
            ready.push(result);
        } else {
            self.held[pass].push(result);
        }

        let before = self.next_pass;
        self.advance();
        for pass in (before + 1)..=self.next_pass.min(self.expected.len() - 1) {
            ready.append(&mut self.held[pass]);
        }

        ready
    }

    fn advance(&mut self) {
        while self.next_pass < self.expected.len()
            && self.received[self.next_pass] >= self.expected[self.next_pass]
        {
            self.next_pass += 1;
        }
    }
}
