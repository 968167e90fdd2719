//! Directives composed from content blocks.
//!
//! Every built-in directive is a [`ComposedDirective`]: a reference mode, an
//! ordered list of [blocks](crate::blocks) and a figure scale policy. The
//! block order matches the word order of the directive name, so
//! `embed-module-plot-print` emits code, then the figure, then the output.

use serde::Deserialize;

use crate::blocks::{
    self, BlockKind,
    BlockKind::{Code, Figure, Output},
};
use crate::{Directive, DirectiveContext, DirectiveError};

use SourceMode::{Member, Module};

/// How the first arguments reference the code to embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// `module`: embed an entire module.
    Module,
    /// `module, Container, member`: embed the body of one member.
    Member,
}

impl SourceMode {
    /// Number of arguments used by the reference.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::Module => 1,
            Self::Member => 3,
        }
    }
}

/// Figure scale policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Scale percentage taken from the argument following the reference.
    Argument,
    /// Fixed scale percentage.
    Fixed(u32),
}

/// Scale used by member-mode built-ins.
const DEFAULT_MEMBER_SCALE: u32 = 80;

/// Scale of member-mode built-in figures.
const MEMBER_SCALE: Scale = Scale::Fixed(DEFAULT_MEMBER_SCALE);

/// Built-in directive table: name, reference mode, blocks, scale.
const BUILTINS: &[(&str, SourceMode, &[BlockKind], Scale)] = &[
    ("embed-module", Module, &[Code], Scale::Argument),
    ("embed-module-print", Module, &[Code, Output], Scale::Argument),
    ("embed-module-plot", Module, &[Code, Figure], Scale::Argument),
    ("embed-module-print-plot", Module, &[Code, Output, Figure], Scale::Argument),
    ("embed-module-plot-print", Module, &[Code, Figure, Output], Scale::Argument),
    ("embed-test", Member, &[Code], MEMBER_SCALE),
    ("embed-plot", Member, &[Figure], MEMBER_SCALE),
    ("embed-test-print", Member, &[Code, Output], MEMBER_SCALE),
    ("embed-test-plot", Member, &[Code, Figure], MEMBER_SCALE),
    ("embed-test-print-plot", Member, &[Code, Output, Figure], MEMBER_SCALE),
    ("embed-test-plot-print", Member, &[Code, Figure, Output], MEMBER_SCALE),
];

/// Directive that embeds code and emits blocks in a declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDirective {
    name: String,
    mode: SourceMode,
    blocks: Vec<BlockKind>,
    scale: Scale,
}

impl ComposedDirective {
    /// Create a composed directive.
    #[must_use]
    pub fn new(name: impl Into<String>, mode: SourceMode, blocks: Vec<BlockKind>, scale: Scale) -> Self {
        Self {
            name: name.into(),
            mode,
            blocks,
            scale,
        }
    }

    /// All built-in directives, in registration order.
    #[must_use]
    pub fn builtins() -> Vec<Self> {
        BUILTINS
            .iter()
            .map(|&(name, mode, blocks, scale)| Self::new(name, mode, blocks.to_vec(), scale))
            .collect()
    }

    fn scale_from_argument(&self) -> bool {
        self.scale == Scale::Argument && self.blocks.contains(&BlockKind::Figure)
    }

    /// Resolve the referenced code to the lines that get listed and executed.
    fn fragment(&self, ctx: &DirectiveContext<'_>, args: &[String]) -> Result<Vec<String>, DirectiveError> {
        let backend = ctx.backend;
        let lines = match self.mode {
            SourceMode::Module => blocks::source_lines(&backend.module_source(&args[0], ctx.file_dir)?),
            SourceMode::Member => {
                let source = backend.member_source(&args[0], &args[1], &args[2], ctx.file_dir)?;
                blocks::member_body(&source, &args[2])
            }
        };
        Ok(lines)
    }

    fn figure_scale(&self, ctx: &DirectiveContext<'_>, args: &[String]) -> Result<u32, DirectiveError> {
        match self.scale {
            Scale::Fixed(scale) => Ok(scale),
            Scale::Argument => {
                let raw = &args[self.mode.arity()];
                raw.parse().map_err(|_| DirectiveError::Argument {
                    path: ctx.file_path(),
                    line: ctx.line(),
                    message: format!(
                        "figure scale for directive \"{}\" must be a whole percentage, got \"{raw}\".",
                        self.name
                    ),
                })
            }
        }
    }
}

impl Directive for ComposedDirective {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.mode.arity() + usize::from(self.scale_from_argument())
    }

    fn run(
        &self,
        ctx: &DirectiveContext<'_>,
        indent: usize,
        args: &[String],
    ) -> Result<Vec<String>, DirectiveError> {
        // Validate the scale before running anything
        let scale = if self.blocks.contains(&BlockKind::Figure) {
            Some(self.figure_scale(ctx, args)?)
        } else {
            None
        };

        let fragment = self.fragment(ctx, args)?;
        let backend = ctx.backend;
        let mut lines = Vec::new();

        for block in &self.blocks {
            match block {
                BlockKind::Code => {
                    lines.extend(blocks::code_block(indent, backend.language(), &fragment));
                }
                BlockKind::Output => {
                    let captured = backend.capture_output(&fragment.join("\n"), ctx.file_dir)?;
                    lines.extend(blocks::output_block(indent, &captured));
                }
                BlockKind::Figure => {
                    let image_path = ctx.figure_path();
                    backend.render_figure(&fragment.join("\n"), ctx.file_dir, &image_path)?;
                    tracing::debug!(figure = %image_path.display(), "rendered figure");
                    lines.extend(blocks::figure_block(
                        indent,
                        &ctx.figure_name(),
                        scale.unwrap_or(DEFAULT_MEMBER_SCALE),
                    ));
                }
            }
        }

        Ok(lines)
    }
}
