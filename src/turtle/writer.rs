//! Turtle writer session.
//!
//! One session renders one document. All mutable rendering state (indent
//! depth, the inline recursion stack, acronyms seen) lives here, never in
//! the graph, so conversions are reentrant.

use std::collections::BTreeSet;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use super::TurtleConfig;
use super::terms::{literal_datatype_acronym, literal_text, node_term, term_acronym};
use crate::model::prefix::acronym_of;
use crate::model::vocab;
use crate::model::{OntologyGraph, Vertex, VertexId};

/// Nesting limit for inline blank nodes.
pub const MAX_INLINE_DEPTH: usize = 32;

const INDENT: &str = "    ";
const BANNER_RULE: &str = "#################################################################";

/// Objects of one predicate, in edge order.
type ObjectList = SmallVec<[VertexId; 4]>;

pub(crate) struct TurtleWriter<'g> {
    graph: &'g OntologyGraph,
    config: &'g TurtleConfig,
    depth: usize,
    stack: HashSet<VertexId>,
    emitted: BTreeSet<String>,
    /// Blank nodes referenced more than once; never inlined.
    shared: HashSet<VertexId>,
}

impl<'g> TurtleWriter<'g> {
    pub(crate) fn new(graph: &'g OntologyGraph, config: &'g TurtleConfig) -> Self {
        Self {
            graph,
            config,
            depth: 0,
            stack: HashSet::new(),
            emitted: BTreeSet::new(),
            shared: graph
                .vertices()
                .iter()
                .filter(|v| v.is_blank() && references(graph, v) > 1)
                .map(Vertex::id)
                .collect(),
        }
    }

    /// Acronyms of every prefixed name written so far.
    pub(crate) fn emitted_acronyms(&self) -> &BTreeSet<String> {
        &self.emitted
    }

    /// Property declarations (ontology mode) followed by subject blocks.
    pub(crate) fn write_body(&mut self) -> String {
        let mut out = String::new();
        if self.config.ontology_mode {
            let properties = self.property_declarations();
            if !properties.is_empty() {
                out.push_str(&banner("Properties"));
                for block in properties {
                    out.push_str(&block);
                    out.push_str("\n\n");
                }
            }
            out.push_str(&banner("Classes"));
        }
        for id in self.roots() {
            let Some(v) = self.graph.vertex(id) else { continue };
            if let Some(block) = self.subject_block(v) {
                out.push_str(&block);
                out.push_str("\n\n");
            }
        }
        out
    }

    fn note(&mut self, term: &str) {
        if let Some(acronym) = term_acronym(term) {
            self.emitted.insert(acronym.to_string());
        }
    }

    // ========================================================================
    // Subject selection
    // ========================================================================

    /// Class vertices that get their own top-level block, in vertex order.
    ///
    /// With inline collapsing, a blank node referenced exactly once is
    /// rendered at its point of reference instead. Blank nodes referenced
    /// from several places, and those no block reaches (e.g. a pure
    /// blank-node cycle), still get their own block.
    fn roots(&self) -> Vec<VertexId> {
        let classes: Vec<&Vertex> = self.graph.classes().collect();
        if !self.config.inline_blank_nodes {
            return classes.iter().map(|v| v.id()).collect();
        }

        let mut roots = HashSet::new();
        let mut covered = HashSet::new();
        for v in &classes {
            if !v.is_blank() || references(self.graph, v) != 1 {
                roots.insert(v.id());
                self.cover(v.id(), &mut covered);
            }
        }
        for v in &classes {
            if v.is_blank() && !covered.contains(&v.id()) {
                roots.insert(v.id());
                self.cover(v.id(), &mut covered);
            }
        }

        classes
            .iter()
            .map(|v| v.id())
            .filter(|id| roots.contains(id))
            .collect()
    }

    /// Mark `from` and every blank node inlined beneath it.
    fn cover(&self, from: VertexId, covered: &mut HashSet<VertexId>) {
        let mut pending = vec![from];
        while let Some(id) = pending.pop() {
            if !covered.insert(id) {
                continue;
            }
            for e in self.graph.outgoing(id) {
                if self.graph.vertex(e.object()).is_some_and(Vertex::is_blank) {
                    pending.push(e.object());
                }
            }
        }
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    fn subject_block(&mut self, v: &Vertex) -> Option<String> {
        let type_clause = match v.type_definition() {
            Some(t) => Some(t.to_string()),
            None if self.config.ontology_mode => Some(vocab::OWL_CLASS.to_string()),
            None => None,
        };

        self.stack.insert(v.id());
        self.depth = 1;
        let pairs = self.predicate_object_list(v, false);
        self.depth = 0;
        self.stack.remove(&v.id());

        if type_clause.is_none() && pairs.is_empty() {
            return None;
        }

        let subject = node_term(v).into_owned();
        self.note(&subject);
        let mut block = subject;
        if let Some(t) = &type_clause {
            self.note(t);
            block.push_str(" a ");
            block.push_str(t);
        }
        match (type_clause.is_some(), pairs.is_empty()) {
            (_, true) => block.push_str(" ."),
            (true, false) => {
                block.push_str(" ;\n");
                block.push_str(&pairs.join(" ;\n"));
                block.push_str(" .");
            }
            (false, false) => {
                block.push('\n');
                block.push_str(&pairs.join(" ;\n"));
                block.push_str(" .");
            }
        }
        Some(block)
    }

    /// Predicate-object pairs of `v`, each indented to the current depth.
    ///
    /// `with_type` prepends `a <type>` for inline blank nodes, whose type
    /// cannot go on a subject line.
    fn predicate_object_list(&mut self, v: &Vertex, with_type: bool) -> Vec<String> {
        let pad = INDENT.repeat(self.depth);
        let mut pairs = Vec::new();

        if with_type {
            if let Some(t) = v.type_definition() {
                self.note(t);
                pairs.push(format!("{pad}a {t}"));
            }
        }

        if self.config.ontology_mode {
            if let Some(label) = v.rdfs_label() {
                self.note(vocab::RDFS_LABEL);
                pairs.push(format!("{pad}{} {}", vocab::RDFS_LABEL, literal_text(label)));
            }
            if let Some(comment) = v.rdfs_comment() {
                self.note(vocab::RDFS_COMMENT);
                pairs.push(format!("{pad}{} {}", vocab::RDFS_COMMENT, literal_text(comment)));
            }
        }

        for (predicate, objects) in self.group_by_predicate(v.id()) {
            self.note(&predicate);
            let rendered = self.object_list(&objects);
            pairs.push(format!("{pad}{predicate} {rendered}"));
        }
        pairs
    }

    /// Outgoing edges grouped by predicate, in first-appearance order.
    fn group_by_predicate(&self, id: VertexId) -> Vec<(String, ObjectList)> {
        let mut groups: Vec<(String, ObjectList)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for e in self.graph.outgoing(id) {
            match index.get(e.name()) {
                Some(&i) => groups[i].1.push(e.object()),
                None => {
                    index.insert(e.name(), groups.len());
                    groups.push((e.name().to_string(), SmallVec::from_elem(e.object(), 1)));
                }
            }
        }
        groups
    }

    fn object_list(&mut self, objects: &[VertexId]) -> String {
        match objects {
            [single] => self.object(*single),
            _ if self.config.collection_syntax => {
                let rendered: Vec<String> = objects.iter().map(|o| self.object(*o)).collect();
                format!("( {} )", rendered.join(" "))
            }
            _ => {
                self.depth += 1;
                let rendered: Vec<String> = objects.iter().map(|o| self.object(*o)).collect();
                let separator = format!(" ,\n{}", INDENT.repeat(self.depth));
                self.depth -= 1;
                rendered.join(&separator)
            }
        }
    }

    fn object(&mut self, id: VertexId) -> String {
        let graph = self.graph;
        let Some(v) = graph.vertex(id) else {
            return String::new();
        };

        if self.config.inline_blank_nodes && v.is_blank() && !self.shared.contains(&id) {
            if self.stack.contains(&id) || self.depth >= MAX_INLINE_DEPTH {
                tracing::warn!(
                    blank = v.name(),
                    depth = self.depth,
                    "blank node cycle or nesting limit; writing a reference instead of inlining"
                );
                return v.name().to_string();
            }
            self.stack.insert(id);
            self.depth += 1;
            let pairs = self.predicate_object_list(v, true);
            self.depth -= 1;
            self.stack.remove(&id);

            return if pairs.is_empty() {
                "[]".to_string()
            } else {
                format!("[\n{}\n{}]", pairs.join(" ;\n"), INDENT.repeat(self.depth))
            };
        }

        if let Some(acronym) = literal_datatype_acronym(v) {
            self.emitted.insert(acronym);
        }
        let term = node_term(v).into_owned();
        if v.is_class() {
            self.note(&term);
        }
        term
    }

    // ========================================================================
    // Property declarations (ontology mode)
    // ========================================================================

    fn property_declarations(&mut self) -> Vec<String> {
        struct Usage {
            domains: Vec<String>,
            ranges: Vec<String>,
            class_objects: bool,
            literal_objects: bool,
        }

        let mut order: Vec<String> = Vec::new();
        let mut usage: HashMap<String, Usage> = HashMap::new();

        for e in self.graph.edges() {
            if e.is_type_definition() || is_builtin(e.name()) {
                continue;
            }
            let (Some(s), Some(o)) = (self.graph.vertex(e.subject()), self.graph.vertex(e.object()))
            else {
                continue;
            };
            let entry = usage.entry(e.name().to_string()).or_insert_with(|| {
                order.push(e.name().to_string());
                Usage { domains: Vec::new(), ranges: Vec::new(), class_objects: false, literal_objects: false }
            });
            if !s.is_blank() {
                push_unique(&mut entry.domains, s.name());
            }
            if o.is_class() {
                entry.class_objects = true;
                if !o.is_blank() {
                    push_unique(&mut entry.ranges, o.name());
                }
            } else {
                entry.literal_objects = true;
                let range = o.resolved_datatype().unwrap_or_else(|| vocab::RDFS_LITERAL.to_string());
                push_unique(&mut entry.ranges, &range);
            }
        }

        let mut blocks = Vec::new();
        for name in order {
            let Some(u) = usage.remove(&name) else { continue };
            let kind = match (u.class_objects, u.literal_objects) {
                (true, false) => vocab::OWL_OBJECT_PROPERTY,
                (false, true) => vocab::OWL_DATATYPE_PROPERTY,
                _ => vocab::RDF_PROPERTY,
            };
            self.note(&name);
            self.note(kind);
            let mut lines = vec![format!("{name} a {kind}")];
            if !u.domains.is_empty() {
                self.note(vocab::RDFS_DOMAIN);
                u.domains.iter().for_each(|d| self.note(d));
                lines.push(format!("{INDENT}{} {}", vocab::RDFS_DOMAIN, u.domains.join(" , ")));
            }
            if !u.ranges.is_empty() {
                self.note(vocab::RDFS_RANGE);
                u.ranges.iter().for_each(|r| self.note(r));
                lines.push(format!("{INDENT}{} {}", vocab::RDFS_RANGE, u.ranges.join(" , ")));
            }
            blocks.push(format!("{} .", lines.join(" ;\n")));
        }
        blocks
    }
}

fn is_builtin(predicate: &str) -> bool {
    acronym_of(predicate).is_some_and(|a| vocab::BUILTIN_ACRONYMS.contains(&a))
}

/// Ordinary edges into `v` from other vertices.
fn references(graph: &OntologyGraph, v: &Vertex) -> usize {
    graph
        .incoming(v.id())
        .filter(|e| !e.is_type_definition() && e.subject() != v.id())
        .count()
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|x| x == item) {
        list.push(item.to_string());
    }
}

fn banner(title: &str) -> String {
    format!("{BANNER_RULE}\n#    {title}\n{BANNER_RULE}\n\n")
}
