//! Attribute reports and header printing.
//!
//! [`introspect`] lists what the schema expects on a node next to what is
//! actually stored. [`HeaderPrinter`] walks a whole file and writes those
//! reports as indented text.

use std::collections::BTreeSet;
use std::io::Write;

use lofardal_store::AttrType;

use crate::error::Result;
use crate::lofar::{Beam, BfFile, LofarFile, TbbFile};
use crate::naming;
use crate::node::Node;
use crate::schema::{self, NodeKind};
use crate::selector::{resolve_attribute, Request, Selection};
use crate::traverse::{check_count, children};
use crate::version::Version;

/// What is known about one attribute of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeReport {
    pub name: String,
    /// Declared type, or the stored type for attributes the schema lacks.
    pub ty: Option<AttrType>,
    /// Defined by the schema at the file's format version.
    pub supported: bool,
    /// Format version that introduced the attribute; `None` outside the schema.
    pub since: Option<Version>,
    pub exists: bool,
    /// Exists with the declared type.
    pub valid: bool,
    /// Rendered stored value.
    pub value: Option<String>,
}

/// Report every schema attribute of `node`, then any stored attributes the
/// schema does not know.
pub fn introspect(node: &Node) -> Result<Vec<AttributeReport>> {
    let version = node.file_version();
    let mut seen = BTreeSet::new();
    let mut reports = Vec::new();

    for entry in schema::entries_for(node.kind()) {
        let handle = node.attr(entry.name);
        let stored = handle.stored_type().ok().flatten();
        let value = match stored {
            Some(_) => handle.value()?.map(|v| v.to_string()),
            None => None,
        };
        seen.insert(entry.name);
        reports.push(AttributeReport {
            name: entry.name.to_string(),
            ty: Some(entry.ty),
            supported: entry.since <= version,
            since: Some(entry.since),
            exists: stored.is_some(),
            valid: stored == Some(entry.ty),
            value,
        });
    }

    for name in node.attribute_names()? {
        if seen.contains(name.as_str()) {
            continue;
        }
        let handle = node.attr(&name);
        reports.push(AttributeReport {
            ty: handle.stored_type()?,
            supported: false,
            since: None,
            exists: true,
            valid: false,
            value: handle.value()?.map(|v| v.to_string()),
            name,
        });
    }
    Ok(reports)
}

// ---------------------------------------------------------------------------
// FormatContext
// ---------------------------------------------------------------------------

/// Layout of printed reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatContext {
    /// Current nesting depth.
    pub indent: usize,
    pub indent_unit: String,
    /// Print schema attributes that are not stored.
    pub show_absent: bool,
}

impl Default for FormatContext {
    fn default() -> Self {
        Self {
            indent: 0,
            indent_unit: "  ".to_string(),
            show_absent: false,
        }
    }
}

impl FormatContext {
    /// The same layout one level deeper.
    pub fn nested(&self) -> FormatContext {
        FormatContext {
            indent: self.indent + 1,
            ..self.clone()
        }
    }

    fn prefix(&self) -> String {
        self.indent_unit.repeat(self.indent)
    }
}

// ---------------------------------------------------------------------------
// HeaderPrinter
// ---------------------------------------------------------------------------

/// Writes attribute reports of a file tree to `W`.
pub struct HeaderPrinter<W: Write> {
    out: W,
}

impl<W: Write> HeaderPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print `node`'s path and attributes.
    ///
    /// `X` and `X_UNIT` share one line. With `only`, just that attribute is
    /// printed.
    pub fn print_node(
        &mut self,
        node: &Node,
        only: Option<&str>,
        ctx: &FormatContext,
    ) -> Result<()> {
        let prefix = ctx.prefix();
        writeln!(self.out, "{prefix}{}", node.path())?;
        let inner = ctx.nested().prefix();

        let reports = introspect(node)?;
        let stored_unit = |name: &str| {
            let unit = format!("{name}_UNIT");
            reports
                .iter()
                .find(|r| r.name == unit && r.exists)
                .and_then(|r| r.value.clone())
        };

        for report in &reports {
            if only.map_or(false, |o| o != report.name) {
                continue;
            }
            if only.is_none() {
                if let Some(base) = report.name.strip_suffix("_UNIT") {
                    let paired = reports.iter().any(|r| r.name == base && r.exists);
                    if paired {
                        continue;
                    }
                }
            }
            let value = match &report.value {
                Some(value) => value.as_str(),
                None if ctx.show_absent || only.is_some() => "(absent)",
                None => continue,
            };
            let mut line = format!("{inner}{} = {value}", report.name);
            if let Some(unit) = stored_unit(&report.name) {
                line.push(' ');
                line.push_str(&unit);
            }
            if let (false, Some(since)) = (report.supported, report.since) {
                line.push_str(&format!("  (needs format {since})"));
            } else if !report.supported {
                line.push_str("  (not in schema)");
            } else if report.exists && !report.valid {
                line.push_str("  (unexpected type)");
            }
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    /// Print a beam-formed file, optionally limited to `request`.
    ///
    /// Without a request every stored SAP, beam and stokes dataset is
    /// printed. An explicit index that does not exist gets a diagnostic line
    /// and is not descended into.
    pub fn print_bf(
        &mut self,
        file: &BfFile,
        request: Option<&Request>,
        ctx: &FormatContext,
    ) -> Result<()> {
        let all = Request {
            sap: Some(Selection::All),
            beam: Some(Selection::All),
            stokes: Some(Selection::All),
            ..Request::default()
        };
        let request = request.unwrap_or(&all);
        let target = request.target_kind();
        let only = request
            .attribute
            .as_deref()
            .map(|a| resolve_attribute(target, a));
        let only = only.as_deref();

        let root = file.root();
        self.print_selected(&root, NodeKind::BfRoot, target, only, ctx)?;
        let Some(saps) = &request.sap else {
            return Ok(());
        };

        let ctx = ctx.nested();
        let kind = NodeKind::SubArrayPointing;
        for sap in self.level(&root, kind, saps, "NOF_SUB_ARRAY_POINTINGS", &ctx)? {
            self.print_selected(&sap, kind, target, only, &ctx)?;
            let Some(beams) = &request.beam else {
                continue;
            };

            let ctx = ctx.nested();
            for beam in self.level(&sap, NodeKind::Beam, beams, "NOF_BEAMS", &ctx)? {
                self.print_selected(&beam, NodeKind::Beam, target, only, &ctx)?;
                let Some(stokes) = &request.stokes else {
                    continue;
                };

                let ctx = ctx.nested();
                if only.is_none() {
                    self.print_coordinates(&beam, &ctx)?;
                }
                for dataset in self.level(&beam, NodeKind::Stokes, stokes, "NOF_STOKES", &ctx)? {
                    self.print_selected(&dataset, NodeKind::Stokes, target, only, &ctx)?;
                }
            }
        }
        Ok(())
    }

    /// Full report, just the requested attribute at the target level, or
    /// only the path on the way there.
    fn print_selected(
        &mut self,
        node: &Node,
        kind: NodeKind,
        target: NodeKind,
        only: Option<&str>,
        ctx: &FormatContext,
    ) -> Result<()> {
        match only {
            None => self.print_node(node, None, ctx),
            Some(name) if kind == target => self.print_node(node, Some(name), ctx),
            Some(_) => {
                writeln!(self.out, "{}{}", ctx.prefix(), node.path())?;
                Ok(())
            }
        }
    }

    /// Stored nodes one selection picks, with diagnostics for missing ones.
    fn level(
        &mut self,
        parent: &Node,
        kind: NodeKind,
        selection: &Selection,
        count_attr: &str,
        ctx: &FormatContext,
    ) -> Result<Vec<Node>> {
        let wanted: Vec<usize> = match selection {
            Selection::All => {
                let found: Vec<Node> = children(parent, kind).collect();
                check_count(parent, count_attr, found.len());
                return Ok(found);
            }
            Selection::One(n) => vec![*n],
            Selection::Set(set) => set.clone(),
        };
        let mut found = Vec::with_capacity(wanted.len());
        for n in wanted {
            let name = naming::indexed_name(kind, n).unwrap_or_else(|| n.to_string());
            let node = parent.child_node(&name, kind);
            if node.exists() {
                found.push(node);
            } else {
                writeln!(self.out, "{}{kind} {n} does not exist", ctx.prefix())?;
            }
        }
        Ok(found)
    }

    fn print_coordinates(&mut self, beam: &Node, ctx: &FormatContext) -> Result<()> {
        let beam = Beam::from(beam.clone());
        let coords = beam.coordinates();
        if !coords.exists() {
            return Ok(());
        }
        self.print_node(&coords, None, ctx)?;
        let ctx = ctx.nested();
        for coordinate in coords.coordinates() {
            self.print_node(coordinate.node(), None, &ctx)?;
        }
        Ok(())
    }

    /// Print a TBB file: trigger, stations and their dipoles.
    pub fn print_tbb(&mut self, file: &TbbFile, ctx: &FormatContext) -> Result<()> {
        let root = file.root();
        self.print_node(&root, None, ctx)?;
        let ctx = ctx.nested();

        let trigger = file.trigger();
        if trigger.exists() {
            self.print_node(&trigger, None, &ctx)?;
        }

        let stations: Vec<_> = file.stations().collect();
        check_count(&root, "NOF_STATIONS", stations.len());
        for station in &stations {
            self.print_node(station, None, &ctx)?;
            let dipoles: Vec<_> = station.dipoles().collect();
            check_count(station, "NOF_DIPOLES", dipoles.len());
            let ctx = ctx.nested();
            for dipole in &dipoles {
                self.print_node(dipole, None, &ctx)?;
            }
        }
        Ok(())
    }

    /// Print any LOFAR file. `request` only applies to beam-formed files.
    pub fn print_file(
        &mut self,
        file: &LofarFile,
        request: Option<&Request>,
        ctx: &FormatContext,
    ) -> Result<()> {
        match file {
            LofarFile::Bf(bf) => self.print_bf(bf, request, ctx),
            LofarFile::Tbb(tbb) => self.print_tbb(tbb, ctx),
            LofarFile::Other(other) => self.print_node(&other.root(), None, ctx),
        }
    }
}
