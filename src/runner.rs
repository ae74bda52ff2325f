//! Run state machine: paces slot-filling across scheduled invocations.
//!
//! Each external invocation performs exactly one transition and exits;
//! an outside scheduler serializes invocations. N - 1 collection passes
//! gather contributor words, the Nth pass finalizes: remaining slots are
//! filled from the word source, the letter is composed and published,
//! and the template is retired. A letter whose frame empties early is
//! finalized ahead of schedule.

use anyhow::{bail, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use letterbot_core::{
    ComposedLetter, Composer, FallbackFiller, NameGenerator, ParserConfig, RunState, SlotBinder,
    StateStore, TemplateParser, Tagger, WordSource, WorkingState,
};

use crate::config::BotConfig;
use crate::ports::{InputSource, Publisher};

/// Title map file expected next to the templates.
const SUMMARY_FILE: &str = "summary.json";

/// Drives the engine through its multi-pass lifecycle.
pub struct BotRunner<'a> {
    config: BotConfig,
    store: StateStore,
    tagger: &'a dyn Tagger,
    words: &'a dyn WordSource,
    names: &'a dyn NameGenerator,
    input: Box<dyn InputSource + 'a>,
    publisher: Box<dyn Publisher + 'a>,
    titles: HashMap<String, String>,
}

impl<'a> BotRunner<'a> {
    pub fn new(
        config: BotConfig,
        tagger: &'a dyn Tagger,
        words: &'a dyn WordSource,
        names: &'a dyn NameGenerator,
        input: Box<dyn InputSource + 'a>,
        publisher: Box<dyn Publisher + 'a>,
    ) -> Self {
        let store = StateStore::new(&config.data_dir);
        let titles = TemplateParser::load_titles(&config.templates_dir.join(SUMMARY_FILE))
            .unwrap_or_else(|err| {
                warn!(error = %err, "no usable title map, falling back to file names");
                HashMap::new()
            });
        Self {
            config,
            store,
            tagger,
            words,
            names,
            input,
            publisher,
            titles,
        }
    }

    /// Build a fresh shuffled backlog and start the first template.
    pub fn init<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let run_order = self.scan_templates(rng)?;
        info!(templates = run_order.len(), "initialized template backlog");
        let mut run = RunState::new(run_order);
        self.start_next_template(&mut run, rng)
    }

    /// Perform one state transition (one scheduled invocation).
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let mut run = self.store.load_run()?;
        let passes = self.config.passes_per_letter;
        info!(
            pass = run.pass,
            processed = run.processed,
            title = %run.current_title,
            "tick"
        );

        if run.is_final_pass(passes) {
            if run.processed {
                // Grace invocation: the letter already went out, only
                // the next template remains to be started.
                return self.start_next_template(&mut run, rng);
            }

            let mut working = self.store.load_working()?;
            self.ingest(&mut run, &mut working, rng)?;
            let filled = FallbackFiller::new(self.words).fill_remaining(&mut working)?;
            if filled > 0 {
                info!(filled, "filled remaining slots from word source");
            }
            self.store.save_working(&working)?;
            self.publish_letter(&working, &format!("Check {passes} of {passes}"))?;
            return self.start_next_template(&mut run, rng);
        }

        if run.processed {
            run.advance_pass(passes);
            return self.store.save_run(&run).map_err(Into::into);
        }

        let mut working = self.store.load_working()?;
        self.ingest(&mut run, &mut working, rng)?;
        self.store.save_working(&working)?;

        if working.is_filled() {
            // Contributors filled every slot ahead of schedule.
            run.processed = true;
            let hours = (passes - run.pass) * self.config.cron_delta_hours;
            self.publish_letter(&working, &format!("Next letter in {hours} hours."))?;
        } else {
            let message = format!(
                "Currently writing {}.\n{}Check {} of {}",
                run.current_title,
                working.frame.status_summary(),
                run.pass,
                passes
            );
            self.publish_status(&message)?;
        }

        run.advance_pass(passes);
        self.store.save_run(&run).map_err(Into::into)
    }

    /// Bind words from `text` into the current letter (direct entry).
    pub fn parse_input(&mut self, text: &str, first_only: bool) -> Result<usize> {
        let mut working = self.store.load_working()?;
        let bound = SlotBinder::new(self.tagger).bind(&mut working, text, first_only)?;
        self.store.save_working(&working)?;
        Ok(bound)
    }

    /// Fill every remaining slot from the word source and compose the
    /// letter. Returns the written path.
    pub fn fill_missing(&mut self) -> Result<(String, PathBuf)> {
        let mut working = self.store.load_working()?;
        FallbackFiller::new(self.words).fill_remaining(&mut working)?;
        self.store.save_working(&working)?;
        let (_, path) = self.compose_and_write(&working)?;
        Ok((working.title, path))
    }

    /// Generate a complete randomized letter in one shot: random
    /// template, fallback fill, compose.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(String, PathBuf)> {
        let files = self.scan_templates(rng)?;
        let template = &files[0];
        info!(template = %template.display(), "generating a letter");

        let mut working = self.parser().parse(template, rng)?;
        FallbackFiller::new(self.words).fill_remaining(&mut working)?;
        self.store.save_working(&working)?;
        let (_, path) = self.compose_and_write(&working)?;
        Ok((working.title, path))
    }

    /// Human summary of the bot's current state.
    pub fn show(&self) -> Result<String> {
        let run = self.store.load_run()?;
        let working = self.store.load_working()?;

        let mut out = String::new();
        let _ = writeln!(out, "Current title: {}", run.current_title);
        let _ = writeln!(out, "Processed: {}", run.processed);
        let _ = writeln!(
            out,
            "Pass: {} of {}",
            run.pass, self.config.passes_per_letter
        );
        let _ = writeln!(out, "Templates left: {}", run.run_order.len());
        let _ = writeln!(
            out,
            "Open slots: {} ({} bound)",
            working.frame.len(),
            working.bindings.len()
        );
        let status = working.frame.status_summary();
        if !status.is_empty() {
            out.push_str(&status);
        }
        Ok(out)
    }

    fn parser(&self) -> TemplateParser<'_> {
        TemplateParser::new(
            ParserConfig {
                fragmentation_ratio: self.config.fragmentation_ratio,
            },
            self.tagger,
        )
        .with_titles(self.titles.clone())
    }

    /// Poll the input source and bind whatever arrived. Transient source
    /// failures are logged and skipped; the tick continues without new
    /// input.
    fn ingest<R: Rng + ?Sized>(
        &mut self,
        run: &mut RunState,
        working: &mut WorkingState,
        rng: &mut R,
    ) -> Result<()> {
        let batch = match self.input.poll(run.cursor.as_deref()) {
            Ok(batch) => batch,
            Err(err) => {
                warn!(error = %err, "input source unavailable, continuing without new input");
                return Ok(());
            }
        };
        if let Some(cursor) = batch.cursor {
            run.cursor = Some(cursor);
        }

        let mut texts = batch.texts;
        texts.shuffle(rng);

        let binder = SlotBinder::new(self.tagger);
        let mut bound = 0;
        for text in &texts {
            bound += binder.bind(working, text, self.config.first_word_only)?;
        }
        if bound > 0 {
            info!(bound, "bound contributor words");
        }
        Ok(())
    }

    /// Retire the current template and start the next one: pop the
    /// backlog (rebuilding it when exhausted), parse, announce.
    fn start_next_template<R: Rng + ?Sized>(
        &mut self,
        run: &mut RunState,
        rng: &mut R,
    ) -> Result<()> {
        run.processed = false;
        let next = match run.run_order.pop() {
            Some(path) => path,
            None => {
                info!("template backlog exhausted, rebuilding");
                run.run_order = self.scan_templates(rng)?;
                run.run_order
                    .pop()
                    .context("template backlog rebuilt but still empty")?
            }
        };
        info!(template = %next.display(), "starting next template");

        let working = self.parser().parse(&next, rng)?;
        run.current_title = working.title.clone();
        run.pass = 1;

        self.publish_status(&format!(
            "Send me single words to include in a letter.\nCurrently writing {}.",
            working.title
        ))?;
        let status = working.frame.status_summary();
        if !status.is_empty() {
            self.publish_status(&status)?;
        }

        self.store.save_working(&working)?;
        self.store.save_run(run).map_err(Into::into)
    }

    /// All template files, shuffled. Sorted first so the shuffle is the
    /// only source of ordering.
    fn scan_templates<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<PathBuf>> {
        let dir = &self.config.templates_dir;
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("failed to read templates directory {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "txt").unwrap_or(false))
            .collect();
        if files.is_empty() {
            bail!("no templates found in {}", dir.display());
        }
        files.sort();
        files.shuffle(rng);
        Ok(files)
    }

    /// Compose the current letter and write it beside the state files.
    fn compose_and_write(&mut self, working: &WorkingState) -> Result<(ComposedLetter, PathBuf)> {
        let today = chrono::Local::now().date_naive();
        let letter = Composer::new(self.names).compose(working, today)?;
        if !letter.unresolved_names.is_empty() {
            warn!(
                regions = letter.unresolved_names.len(),
                "letter has unresolved name regions"
            );
        }
        let path = self.store.write_letter(&letter.file_name, &letter.html)?;
        Ok((letter, path))
    }

    fn publish_letter(&mut self, working: &WorkingState, trailer: &str) -> Result<()> {
        let (letter, _) = self.compose_and_write(working)?;
        self.publisher
            .publish_letter(&working.title, &letter.file_name, &letter.html)?;
        self.publish_status(&format!(
            "{}: {}\n{}",
            working.title, letter.file_name, trailer
        ))?;
        Ok(())
    }

    /// Publish a status message, clamped to the configured maximum.
    fn publish_status(&mut self, message: &str) -> Result<String> {
        let clamped: String = if message.chars().count() > self.config.max_status_len {
            message.chars().take(self.config.max_status_len).collect()
        } else {
            message.to_string()
        };
        self.publisher.publish_status(&clamped)
    }
}
