//! Rule program execution
//!
//! A `Processor` owns an immutable rule program and runs it over any
//! `BufRead` into any `Write`. Programs made only of line rules stream: each
//! input line is read, processed and written (and flushed) before the next one
//! is read, so they work on endless inputs such as `tail -f`. Anything else
//! buffers the whole input and applies the document rules in order.

use crate::capability::{buffering_reason, can_stream};
use crate::context::LineContext;
use crate::rule::{DocumentRule, LineRule, Pipeline, Rule, apply_documents, build_document_rules};
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use tracing::{debug, trace};

/// An executable rule program
#[derive(Debug, Clone)]
pub enum Program {
    /// Every rule is a line rule
    Streaming(Vec<LineRule>),
    /// Consecutive line rules grouped into `ApplyAll` document rules
    Buffered(Vec<DocumentRule>),
}

impl Program {
    /// Build the program, streaming whenever the rules allow it and
    /// `allow_streaming` is set.
    pub fn new(rules: Vec<Rule>, allow_streaming: bool) -> Self {
        if allow_streaming && can_stream(&rules) {
            let line_rules = rules
                .into_iter()
                .filter_map(|rule| match rule {
                    Rule::Line(rule) => Some(rule),
                    Rule::Document(_) => None,
                })
                .collect();
            return Program::Streaming(line_rules);
        }

        debug!(
            reason = buffering_reason(&rules).unwrap_or("streaming disabled"),
            "buffering input"
        );
        Program::Buffered(build_document_rules(rules))
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self, Program::Streaming(_))
    }
}

/// Runs a rule program over input streams
#[derive(Debug, Clone)]
pub struct Processor {
    program: Program,
}

impl Processor {
    /// Streams when every rule is a line rule, buffers otherwise.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self::with_streaming(rules, true)
    }

    /// Always buffers the whole input, even for line-only programs.
    pub fn buffered(rules: Vec<Rule>) -> Self {
        Self::with_streaming(rules, false)
    }

    pub fn with_streaming(rules: Vec<Rule>, allow_streaming: bool) -> Self {
        Self {
            program: Program::new(rules, allow_streaming),
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn is_streaming(&self) -> bool {
        self.program.is_streaming()
    }

    /// Process `input` line by line, writing each output line followed by
    /// `\n` to `output`.
    ///
    /// # Errors
    ///
    /// Fails on the first read, write or rule error. Output already written
    /// in streaming mode stays written.
    pub fn process<R: BufRead, W: Write>(&self, input: R, output: &mut W) -> Result<()> {
        match &self.program {
            Program::Streaming(rules) => self.process_streaming(rules, input, output),
            Program::Buffered(rules) => self.process_buffered(rules, input, output),
        }
    }

    /// Run the program over lines already in memory.
    ///
    /// # Errors
    ///
    /// Fails on the first rule error.
    pub fn process_lines(&self, lines: Vec<String>) -> Result<Vec<String>> {
        match &self.program {
            Program::Streaming(rules) => {
                let mut output = Vec::with_capacity(lines.len());
                let mut pipeline = Pipeline::new(rules);
                let mut ctx = LineContext::new();
                pipeline.setup(&mut ctx);

                for line in &lines {
                    ctx.line_num += 1;
                    output.extend(pipeline.emit(line, &mut ctx).context("error applying rules")?);
                }
                Ok(output)
            }
            Program::Buffered(rules) => apply_documents(rules, lines).context("error applying rules"),
        }
    }

    fn process_streaming<R: BufRead, W: Write>(&self, rules: &[LineRule], mut input: R, output: &mut W) -> Result<()> {
        debug!(rules = rules.len(), "streaming input");

        let mut pipeline = Pipeline::new(rules);
        let mut ctx = LineContext::new();
        pipeline.setup(&mut ctx);

        let mut buf = Vec::new();
        while let Some(line) = read_line(&mut input, &mut buf).context("error reading input")? {
            ctx.line_num += 1;

            let results = pipeline
                .emit(&line, &mut ctx)
                .with_context(|| format!("error applying rules at line {}", ctx.line_num))?;
            trace!(line_num = ctx.line_num, outputs = results.len(), printing = ?ctx.printing, "processed line");

            if results.is_empty() {
                continue;
            }
            for result in &results {
                writeln!(output, "{}", result)?;
            }
            output.flush()?;
        }

        debug!(lines = ctx.line_num, "stream finished");
        Ok(())
    }

    fn process_buffered<R: BufRead, W: Write>(&self, rules: &[DocumentRule], mut input: R, output: &mut W) -> Result<()> {
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        while let Some(line) = read_line(&mut input, &mut buf).context("error reading input")? {
            lines.push(line);
        }
        debug!(lines = lines.len(), rules = rules.len(), "applying document rules");

        let results = apply_documents(rules, lines).context("error applying rules")?;

        for result in &results {
            writeln!(output, "{}", result)?;
        }
        output.flush()?;
        Ok(())
    }
}

/// Read the next line without its `\n` or `\r\n` terminator.
///
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the run.
/// Returns `None` at end of input.
fn read_line<R: BufRead>(input: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if input.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}
