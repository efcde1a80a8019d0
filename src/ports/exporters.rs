//! Program Exporters
//!
//! Built-in backends: JSON manifest, Graphviz DOT call graph, plain text listing.

use crate::api::dto::ProgramDto;
use crate::domain::function::{FunctionKind, ShaderProgram};
use crate::ports::ShaderBackend;
use anyhow::Result;
use std::fmt::Display;

/// JSON manifest of each program, functions in emission order.
pub struct ManifestExporter;

impl<B: Display> ShaderBackend<B> for ManifestExporter {
    fn emit(&self, program: &ShaderProgram<B>) -> Result<String> {
        Ok(serde_json::to_string_pretty(&ProgramDto::from(program))?)
    }

    fn emit_all(&self, programs: &[ShaderProgram<B>]) -> Result<String> {
        let dtos: Vec<ProgramDto> = programs.iter().map(ProgramDto::from).collect();
        Ok(serde_json::to_string_pretty(&dtos)?)
    }
}

/// Graphviz DOT of each program's call graph.
pub struct DotExporter;

impl DotExporter {
    fn node_style(kind: FunctionKind) -> (&'static str, &'static str, &'static str) {
        match kind {
            FunctionKind::VertexEntryPoint => ("box", "#a6e3a1", "filled,rounded"),   // Green
            FunctionKind::FragmentEntryPoint => ("box", "#f9e2af", "filled,rounded"), // Yellow
            FunctionKind::ComputeEntryPoint => ("hexagon", "#cba6f7", "filled"),      // Purple
            FunctionKind::Normal => ("box", "#89b4fa", "filled"),                     // Blue
        }
    }

    fn escape_label(label: &str) -> String {
        label
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }
}

impl<B> ShaderBackend<B> for DotExporter {
    fn emit(&self, program: &ShaderProgram<B>) -> Result<String> {
        let mut lines = Vec::new();

        lines.push(format!("digraph \"{}\" {{", Self::escape_label(&program.root.to_string())));
        lines.push("    rankdir=BT;".to_string()); // callees below callers
        lines.push("    node [fontname=\"Helvetica\", fontsize=12];".to_string());
        lines.push(String::new());

        for (order, f) in program.functions.iter().enumerate() {
            let record = &f.function;
            let (shape, color, style) = Self::node_style(record.kind);
            let label = format!("{}. {}\\n{}", order + 1, record.name(), record.type_name());
            lines.push(format!(
                "    \"{}\" [label=\"{}\", shape={}, style=\"{}\", fillcolor=\"{}\"];",
                Self::escape_label(&record.identity.to_string()),
                label,
                shape,
                style,
                color
            ));
        }

        lines.push(String::new());

        for (from, to) in &program.calls {
            lines.push(format!(
                "    \"{}\" -> \"{}\";",
                Self::escape_label(&from.to_string()),
                Self::escape_label(&to.to_string())
            ));
        }

        lines.push("}".to_string());
        Ok(lines.join("\n"))
    }
}

/// One line per function: `owner::name(params) -> ret [kind]`.
pub struct TextExporter;

impl<B> ShaderBackend<B> for TextExporter {
    fn emit(&self, program: &ShaderProgram<B>) -> Result<String> {
        let mut lines = vec![format!("# {} ({})", program.root, program.kind)];
        for f in &program.functions {
            let record = &f.function;
            let params: Vec<String> = record
                .parameters
                .iter()
                .map(|p| format!("{}: {}", p.name, p.ty))
                .collect();
            let mut line = format!("{}({}) -> {} [{}]", record.identity, params.join(", "), record.return_type, record.kind);
            if record.kind == FunctionKind::ComputeEntryPoint {
                let d = record.dispatch;
                line.push_str(&format!(" ({}, {}, {})", d.x, d.y, d.z));
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }
}
