//! Selector strings addressing parts of a beam-formed file.
//!
//! ```text
//! [/ | /ROOT/] SAP<n> [/BEAM<n> [/STOKES<n>]] [:attribute] [=value]
//! ```
//!
//! Tokens are case-insensitive and take an optional `_` before the index.
//! `SUB_ARRAY_POINTING` may be spelled out. A missing index selects every
//! stored child; the index may also be a set such as `[0,2~4]`.

use std::fmt;

use crate::error::{Error, Result};
use crate::naming;
use crate::node::{Group, Node};
use crate::schema::{self, NodeKind};
use crate::traverse::children;

/// Which children of one level a request addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    One(usize),
    Set(Vec<usize>),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::One(n) => write!(f, "{n}"),
            Selection::Set(set) => {
                let items: Vec<String> = set.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(","))
            }
        }
    }
}

/// A parsed selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub sap: Option<Selection>,
    pub beam: Option<Selection>,
    pub stokes: Option<Selection>,
    /// Attribute name as written, e.g. `pointRA` or `POINT_RA`.
    pub attribute: Option<String>,
    pub value: Option<String>,
}

impl Request {
    /// Kind of the deepest level the request addresses.
    pub fn target_kind(&self) -> NodeKind {
        if self.stokes.is_some() {
            NodeKind::Stokes
        } else if self.beam.is_some() {
            NodeKind::Beam
        } else if self.sap.is_some() {
            NodeKind::SubArrayPointing
        } else {
            NodeKind::BfRoot
        }
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

const SAP_PREFIXES: &[&str] = &["SUB_ARRAY_POINTING_", "SUB_ARRAY_POINTING", "SAP_", "SAP"];
const BEAM_PREFIXES: &[&str] = &["BEAM_", "BEAM"];
const STOKES_PREFIXES: &[&str] = &["STOKES_", "STOKES"];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Level {
    Sap,
    Beam,
    Stokes,
}

fn invalid(input: &str, reason: impl Into<String>) -> Error {
    Error::InvalidSelector {
        input: input.to_string(),
        reason: reason.into(),
    }
}

/// Parse a selector string into a [`Request`].
pub fn parse(input: &str) -> Result<Request> {
    let mut request = Request::default();

    let (rest, value) = match input.split_once('=') {
        Some((rest, value)) => (rest, Some(value.to_string())),
        None => (input, None),
    };
    request.value = value;

    let (path, attribute) = match rest.split_once(':') {
        Some((path, attr)) => {
            let attr = attr.trim();
            if attr.is_empty() {
                return Err(invalid(input, "empty attribute name"));
            }
            (path, Some(attr.to_string()))
        }
        None => (rest, None),
    };
    request.attribute = attribute;

    let path = path.trim().to_ascii_uppercase();
    let path = strip_root(&path);

    let mut last: Option<Level> = None;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let (level, index) = classify(segment).ok_or_else(|| {
            invalid(input, format!("unknown token {segment:?}"))
        })?;
        let expected = match last {
            None => Level::Sap,
            Some(Level::Sap) => Level::Beam,
            Some(Level::Beam) => Level::Stokes,
            Some(Level::Stokes) => {
                return Err(invalid(input, "nothing can follow a stokes token"))
            }
        };
        if level != expected {
            let reason = match level {
                Level::Sap => "sub-array pointing must come first",
                Level::Beam => "a beam needs a sub-array pointing",
                Level::Stokes => "stokes needs a beam",
            };
            return Err(invalid(input, reason));
        }
        let selection = parse_selection(index).map_err(|e| match e {
            Error::InvalidSelector { reason, .. } => invalid(input, reason),
            other => other,
        })?;
        match level {
            Level::Sap => request.sap = Some(selection),
            Level::Beam => request.beam = Some(selection),
            Level::Stokes => request.stokes = Some(selection),
        }
        last = Some(level);
    }

    if request.value.is_some() && request.attribute.is_none() {
        return Err(invalid(input, "a value needs an attribute"));
    }
    Ok(request)
}

fn strip_root(path: &str) -> &str {
    if let Some(rest) = path.strip_prefix("/ROOT") {
        if rest.is_empty() || rest.starts_with('/') {
            return rest;
        }
    }
    path.strip_prefix('/').unwrap_or(path)
}

fn classify(segment: &str) -> Option<(Level, &str)> {
    let levels = [
        (Level::Sap, SAP_PREFIXES),
        (Level::Beam, BEAM_PREFIXES),
        (Level::Stokes, STOKES_PREFIXES),
    ];
    levels.iter().find_map(|(level, prefixes)| {
        prefixes
            .iter()
            .find_map(|p| segment.strip_prefix(p))
            .map(|index| (*level, index))
    })
}

fn parse_selection(index: &str) -> Result<Selection> {
    let index = index.trim();
    if index.is_empty() {
        return Ok(Selection::All);
    }
    if index.bytes().all(|b| b.is_ascii_digit()) {
        return index
            .parse()
            .map(Selection::One)
            .map_err(|_| invalid(index, "index out of range"));
    }
    parse_index_set(index).map(Selection::Set)
}

/// Most indices a single index set may select.
pub const MAX_INDEX_SET_LEN: usize = 1 << 16;

/// Parse `[a,b~c,...]` into the listed indices, in order.
///
/// Brackets are optional; `b~c` is inclusive. Sets selecting more than
/// [`MAX_INDEX_SET_LEN`] indices are rejected.
pub fn parse_index_set(input: &str) -> Result<Vec<usize>> {
    let body = input.trim();
    let body = match (body.strip_prefix('['), body.ends_with(']')) {
        (Some(inner), true) => &inner[..inner.len() - 1],
        (None, false) => body,
        _ => return Err(invalid(input, "unbalanced brackets")),
    };

    let number = |token: &str| -> Result<usize> {
        let token = token.trim();
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(input, format!("{token:?} is not an index")));
        }
        token
            .parse()
            .map_err(|_| invalid(input, format!("{token:?} is out of range")))
    };

    let mut out = Vec::new();
    for token in body.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(invalid(input, "empty list element"));
        }
        let mut bounds = token.split('~');
        match (bounds.next(), bounds.next(), bounds.next()) {
            (Some(one), None, None) => {
                check_len(input, out.len(), 1)?;
                out.push(number(one)?);
            }
            (Some(lo), Some(hi), None) => {
                let (lo, hi) = (number(lo)?, number(hi)?);
                if lo > hi {
                    return Err(invalid(input, format!("range {lo}~{hi} is reversed")));
                }
                check_len(input, out.len(), (hi - lo).saturating_add(1))?;
                out.extend(lo..=hi);
            }
            _ => return Err(invalid(input, format!("{token:?} has more than one '~'"))),
        }
    }
    Ok(out)
}

fn check_len(input: &str, have: usize, adding: usize) -> Result<()> {
    if adding > MAX_INDEX_SET_LEN - have {
        return Err(invalid(
            input,
            format!("selects more than {MAX_INDEX_SET_LEN} indices"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Path building
// ---------------------------------------------------------------------------

/// Nodes a single level of `selection` picks below `parent`.
fn select(parent: &Node, kind: NodeKind, selection: &Selection) -> Vec<Node> {
    let child = |n: usize| {
        let name = naming::indexed_name(kind, n).unwrap_or_else(|| n.to_string());
        parent.child_node(&name, kind)
    };
    match selection {
        Selection::All => children(parent, kind).collect(),
        Selection::One(n) => vec![child(*n)],
        Selection::Set(set) => set.iter().map(|&n| child(n)).collect(),
    }
}

/// Nodes `request` addresses below `root`, in order.
///
/// Explicit indices are composed whether or not they exist; `All` only
/// yields stored children.
pub fn select_nodes(request: &Request, root: &Group) -> Vec<Node> {
    let levels = [
        (NodeKind::SubArrayPointing, &request.sap),
        (NodeKind::Beam, &request.beam),
        (NodeKind::Stokes, &request.stokes),
    ];
    let mut nodes = vec![root.node().clone()];
    for (kind, selection) in levels {
        let Some(selection) = selection else { break };
        nodes = nodes
            .iter()
            .flat_map(|parent| select(parent, kind, selection))
            .collect();
    }
    nodes
}

/// On-disk name of the requested attribute as seen from `kind`.
pub fn resolve_attribute(kind: NodeKind, attribute: &str) -> String {
    match schema::definition_for_alias(kind, attribute) {
        Some(entry) => entry.name.to_string(),
        None => schema::to_canonical_name(attribute),
    }
}

/// Canonical paths `request` addresses below `root`, in order.
///
/// With an attribute the paths name the attribute, e.g.
/// `/SUB_ARRAY_POINTING_001/BEAM_002/POINT_RA`.
pub fn build_paths(request: &Request, root: &Group) -> Result<Vec<String>> {
    let nodes = select_nodes(request, root);
    let attribute = request
        .attribute
        .as_deref()
        .map(|a| resolve_attribute(request.target_kind(), a));
    Ok(nodes
        .iter()
        .map(|node| match &attribute {
            Some(attr) => naming::join(node.path(), attr),
            None => node.path().to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileCreateOptions;
    use crate::lofar::BfFile;
    use proptest::prelude::*;
    use tempfile::TempDir;

    // ------------------------------------------------------------------
    // Tokenizer
    // ------------------------------------------------------------------

    #[test]
    fn sap_beam_attribute() {
        let req = parse("SAP1/BEAM2:pointRA").unwrap();
        assert_eq!(req.sap, Some(Selection::One(1)));
        assert_eq!(req.beam, Some(Selection::One(2)));
        assert_eq!(req.stokes, None);
        assert_eq!(req.attribute.as_deref(), Some("pointRA"));
        assert_eq!(req.value, None);
    }

    #[test]
    fn spellings_are_equivalent() {
        let expected = parse("SAP_3/BEAM_0/STOKES_1").unwrap();
        for s in [
            "/sap3/beam0/stokes1",
            "/ROOT/SUB_ARRAY_POINTING_003/BEAM_000/STOKES_1",
            "sub_array_pointing3/Beam0/Stokes1",
        ] {
            assert_eq!(parse(s).unwrap(), expected, "{s}");
        }
    }

    #[test]
    fn missing_index_means_all() {
        let req = parse("/SAP/BEAM").unwrap();
        assert_eq!(req.sap, Some(Selection::All));
        assert_eq!(req.beam, Some(Selection::All));
        assert_eq!(parse("/").unwrap(), Request::default());
    }

    #[test]
    fn sets_and_values() {
        let req = parse("SAP[0,2~3]:observer=Jane Doe").unwrap();
        assert_eq!(req.sap, Some(Selection::Set(vec![0, 2, 3])));
        assert_eq!(req.attribute.as_deref(), Some("observer"));
        assert_eq!(req.value.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn rejects_malformed() {
        for s in [
            "BEAM1",
            "/BEAM1/STOKES0",
            "SAP0/STOKES0",
            "SAP0/BEAM0/STOKES0/BEAM1",
            "SAP0/SAP1",
            "SAPX",
            "FOO",
            "SAP0:",
            "SAP0=1",
            "SAP[1~2~3]",
            "SAP[3~1]",
            "SAP[1,,2]",
            "SAP[1,2",
        ] {
            assert!(
                matches!(parse(s), Err(Error::InvalidSelector { .. })),
                "{s} should be rejected"
            );
        }
    }

    #[test]
    fn oversized_index_sets_rejected() {
        let max = usize::MAX;
        for s in [
            format!("0~{max}"),
            "0~10000000000000".to_string(),
            format!("1,0~{}", MAX_INDEX_SET_LEN - 1),
        ] {
            assert!(
                matches!(parse_index_set(&s), Err(Error::InvalidSelector { .. })),
                "{s} should be rejected"
            );
        }
        assert!(matches!(
            parse(&format!("SAP[0~{max}]")),
            Err(Error::InvalidSelector { .. })
        ));
        let full = parse_index_set(&format!("0~{}", MAX_INDEX_SET_LEN - 1)).unwrap();
        assert_eq!(full.len(), MAX_INDEX_SET_LEN);
    }

    #[test]
    fn index_set_grammar() {
        assert_eq!(parse_index_set("[1,3~5,0]").unwrap(), vec![1, 3, 4, 5, 0]);
        assert_eq!(parse_index_set("7").unwrap(), vec![7]);
        assert_eq!(parse_index_set("2~2").unwrap(), vec![2]);
        assert!(parse_index_set("").is_err());
        assert!(parse_index_set("a").is_err());
        assert!(parse_index_set("-1").is_err());
    }

    proptest! {
        #[test]
        fn index_set_lists_every_member(
            items in prop::collection::vec((0usize..500, 0usize..5), 1..8),
        ) {
            let text: Vec<String> = items
                .iter()
                .map(|&(lo, span)| if span == 0 { lo.to_string() } else { format!("{}~{}", lo, lo + span) })
                .collect();
            let expected: Vec<usize> = items
                .iter()
                .flat_map(|&(lo, span)| lo..=lo + span)
                .collect();
            prop_assert_eq!(parse_index_set(&format!("[{}]", text.join(","))).unwrap(), expected.clone());
            prop_assert_eq!(parse_index_set(&text.join(",")).unwrap(), expected);
        }

        #[test]
        fn reversed_ranges_rejected(lo in 1usize..1000, gap in 1usize..10) {
            let hi = lo.saturating_sub(gap);
            prop_assume!(hi < lo);
            let parsed = parse_index_set(&format!("{}~{}", lo, hi));
            prop_assert!(parsed.is_err());
        }
    }

    // ------------------------------------------------------------------
    // Path building
    // ------------------------------------------------------------------

    fn bf_file(dir: &TempDir) -> BfFile {
        BfFile::create(dir.path().join("sel.h5"), &FileCreateOptions::new()).unwrap()
    }

    #[test]
    fn explicit_attribute_path() {
        let dir = TempDir::new().unwrap();
        let file = bf_file(&dir);
        let req = parse("SAP1/BEAM2:pointRA").unwrap();
        assert_eq!(
            build_paths(&req, &file.root()).unwrap(),
            vec!["/SUB_ARRAY_POINTING_001/BEAM_002/POINT_RA".to_string()]
        );
    }

    #[test]
    fn unknown_attribute_is_upper_snaked() {
        let dir = TempDir::new().unwrap();
        let file = bf_file(&dir);
        let req = parse("SAP0:myCustomField").unwrap();
        assert_eq!(
            build_paths(&req, &file.root()).unwrap(),
            vec!["/SUB_ARRAY_POINTING_000/MY_CUSTOM_FIELD".to_string()]
        );
        let req = parse(":telescope").unwrap();
        assert_eq!(build_paths(&req, &file.root()).unwrap(), vec!["/TELESCOPE"]);
    }

    #[test]
    fn all_stops_at_first_gap() {
        let dir = TempDir::new().unwrap();
        let file = bf_file(&dir);
        for sap in [0, 1, 3] {
            file.sub_array_pointing(sap).create().unwrap();
        }
        file.sub_array_pointing(0).beam(0).create().unwrap();
        file.sub_array_pointing(1).beam(0).create().unwrap();
        file.sub_array_pointing(1).beam(1).create().unwrap();

        let paths = build_paths(&parse("/SAP/BEAM").unwrap(), &file.root()).unwrap();
        assert_eq!(
            paths,
            vec![
                "/SUB_ARRAY_POINTING_000/BEAM_000",
                "/SUB_ARRAY_POINTING_001/BEAM_000",
                "/SUB_ARRAY_POINTING_001/BEAM_001",
            ]
        );
    }
}
