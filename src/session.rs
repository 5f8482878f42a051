// A rendering session: gate on the required resources, lay the scene out
// once, then track the cursor frame by frame.

use crate::catalog::CatalogRecord;
use crate::config::Config;
use crate::hover::{Selection, click_target, hit_test};
use crate::layout::{Canvas, Layout, Point, compute_layout_with_rng, resolve_seed};
use crate::text_metrics::TextMeasure;
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot lay out yet, still waiting for: {}", missing.join(", "))]
    NotReady { missing: Vec<&'static str> },
}

/// Collects the session inputs. Layout only starts once both the catalog and
/// a text measurer are present; related words are optional.
pub struct SessionBuilder {
    config: Config,
    records: Option<Vec<CatalogRecord>>,
    words: Vec<String>,
    measurer: Option<Box<dyn TextMeasure>>,
}

impl SessionBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            records: None,
            words: Vec::new(),
            measurer: None,
        }
    }

    pub fn catalog(mut self, records: Vec<CatalogRecord>) -> Self {
        self.records = Some(records);
        self
    }

    pub fn related_words(mut self, words: Vec<String>) -> Self {
        self.words = words;
        self
    }

    pub fn measurer(mut self, measurer: Box<dyn TextMeasure>) -> Self {
        self.measurer = Some(measurer);
        self
    }

    pub fn is_ready(&self) -> bool {
        self.missing().is_empty()
    }

    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.records.is_none() {
            missing.push("catalog");
        }
        if self.measurer.is_none() {
            missing.push("font metrics");
        }
        missing
    }

    pub fn build(self) -> Result<Session, SessionError> {
        let missing = self.missing();
        let (Some(records), Some(measurer)) = (self.records, self.measurer) else {
            return Err(SessionError::NotReady { missing });
        };
        let seed = resolve_seed(self.config.layout.seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut layout = lay_out(&self.config, &records, &self.words, measurer.as_ref(), &mut rng);
        layout.seed = seed;
        Ok(Session {
            config: self.config,
            records,
            words: self.words,
            measurer,
            rng,
            layout,
            selection: Selection::Nothing,
        })
    }
}

fn lay_out(
    config: &Config,
    records: &[CatalogRecord],
    words: &[String],
    measurer: &dyn TextMeasure,
    rng: &mut ChaCha8Rng,
) -> Layout {
    let layout = compute_layout_with_rng(
        records,
        words,
        measurer,
        &config.catalog,
        &config.layout,
        config.theme.background_word_size,
        Canvas::new(config.render.width, config.render.height),
        rng,
    );
    debug!(
        "layout pass: {} stars, {} background words",
        layout.stars.len(),
        layout.background.len()
    );
    layout
}

pub struct Session {
    config: Config,
    records: Vec<CatalogRecord>,
    words: Vec<String>,
    measurer: Box<dyn TextMeasure>,
    rng: ChaCha8Rng,
    layout: Layout,
    selection: Selection,
}

impl Session {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.config.render.width, self.config.render.height)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn measurer(&self) -> &dyn TextMeasure {
        self.measurer.as_ref()
    }

    /// Full layout pass. The registry is rebuilt from scratch and the random
    /// source continues, so each call yields a fresh arrangement.
    pub fn relayout(&mut self) {
        let seed = self.layout.seed;
        self.layout = lay_out(
            &self.config,
            &self.records,
            &self.words,
            self.measurer.as_ref(),
            &mut self.rng,
        );
        self.layout.seed = seed;
        self.selection = Selection::Nothing;
    }

    /// Per-frame update: hit-tests the cursor against the star labels.
    pub fn update(&mut self, cursor: Point) -> &Selection {
        self.selection = hit_test(cursor, &self.layout.stars);
        &self.selection
    }

    /// Link to open for a primary click at `cursor`, if any.
    pub fn click(&self, cursor: Point) -> Option<String> {
        click_target(cursor, self.canvas(), &self.selection)
    }
}
