//! Turning decoded class files into output for the terminal.
use std::fmt::Write;
use anyhow::{Context, Result};
use serde::Serialize;
use classlens::model::{CatchType, ClassModel, Code, Method};
use classlens::pool::PoolError;
use classlens::{Inspection, Section};

pub(crate) fn to_json(value: &impl Serialize, pretty: bool) -> Result<String> {
	let json = if pretty {
		serde_json::to_string_pretty(value)
	} else {
		serde_json::to_string(value)
	};
	json.context("failed to serialize output as json")
}

/// Shows the value for a resolved index, or the reason it couldn't be resolved.
fn resolved(result: Result<&str, PoolError>) -> String {
	match result {
		Ok(string) => string.to_owned(),
		Err(e) => format!("<{e}>"),
	}
}

pub(crate) fn provenance_text(inspection: &Inspection) -> String {
	fn write_section(out: &mut String, section: &Section, depth: usize, hex: &[String]) {
		let bytes = hex.get(section.start_offset..section.end_offset.min(section.start_offset + 8))
			.map(|tokens| tokens.join(" "))
			.unwrap_or_default();
		let ellipsis = if section.end_offset - section.start_offset > 8 { " .." } else { "" };
		let _ = writeln!(
			out,
			"{:>6}..{:<6} {:indent$}{}  [{bytes}{ellipsis}]",
			section.start_offset, section.end_offset, "", section.label,
			indent = depth * 2,
		);
		for child in &section.children {
			write_section(out, child, depth + 1, hex);
		}
	}

	let mut out = String::new();
	for section in &inspection.sections {
		write_section(&mut out, section, 0, &inspection.hex);
	}
	if let Some(error) = &inspection.error {
		let _ = writeln!(out, "error: {error}");
	}
	out
}

/// Sixteen tokens per line, prefixed with the offset of the first.
pub(crate) fn hex_text(hex: &[String]) -> String {
	hex.chunks(16)
		.enumerate()
		.map(|(line, tokens)| format!("{:08x}  {}", line * 16, tokens.join(" ")))
		.collect::<Vec<_>>()
		.join("\n")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModelReport {
	name: String,
	super_name: Option<String>,
	version: String,
	access_flags: String,
	interfaces: Vec<String>,
	fields: Vec<FieldReport>,
	methods: Vec<MethodReport>,
	error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldReport {
	name: String,
	descriptor: String,
	access_flags: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MethodReport {
	name: String,
	descriptor: String,
	access_flags: String,
	signature: Result<Vec<String>, String>,
	arg_count: Option<usize>,
	code: Option<CodeReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CodeReport {
	max_stack: u16,
	max_locals: u16,
	code_length: usize,
	exception_handlers: Vec<HandlerReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HandlerReport {
	start_pc: u16,
	end_pc: u16,
	handler_pc: u16,
	/// [`None`] for catching anything.
	catch_type: Option<String>,
}

impl ModelReport {
	pub(crate) fn new(model: &ClassModel, error: Option<String>) -> ModelReport {
		ModelReport {
			name: resolved(model.name()),
			super_name: match model.super_name() {
				Ok(name) => name.map(str::to_owned),
				Err(e) => Some(format!("<{e}>")),
			},
			version: model.version().to_string(),
			access_flags: format!("{:?}", model.access_flags()),
			interfaces: model.interfaces().iter()
				.map(|&index| resolved(model.pool().get_class_name(index)))
				.collect(),
			fields: model.fields().iter()
				.map(|field| FieldReport {
					name: resolved(model.field_name(field)),
					descriptor: resolved(model.field_descriptor(field)),
					access_flags: format!("{:?}", field.access_flags),
				})
				.collect(),
			methods: model.methods().iter()
				.map(|method| MethodReport::new(model, method))
				.collect(),
			error,
		}
	}
}

impl MethodReport {
	fn new(model: &ClassModel, method: &Method) -> MethodReport {
		MethodReport {
			name: resolved(model.method_name(method)),
			descriptor: resolved(model.method_descriptor(method)),
			access_flags: format!("{:?}", method.access_flags),
			signature: match &method.signature {
				Ok(markers) => Ok(markers.iter().map(ToString::to_string).collect()),
				Err(e) => Err(e.to_string()),
			},
			arg_count: method.arg_count(),
			code: method.code.as_ref().map(CodeReport::new),
		}
	}
}

impl CodeReport {
	fn new(code: &Code) -> CodeReport {
		CodeReport {
			max_stack: code.max_stack,
			max_locals: code.max_locals,
			code_length: code.instructions.len(),
			exception_handlers: code.exception_handlers.iter()
				.map(|handler| HandlerReport {
					start_pc: handler.start_pc,
					end_pc: handler.end_pc,
					handler_pc: handler.handler_pc,
					catch_type: match &handler.catch_type {
						CatchType::Any => None,
						CatchType::Class { name: Ok(name), .. } => Some(name.clone()),
						CatchType::Class { index, name: Err(e) } => Some(format!("<#{index}: {e}>")),
					},
				})
				.collect(),
		}
	}
}

pub(crate) fn model_text(model: &ClassModel) -> String {
	let mut out = String::new();

	let _ = writeln!(out, "class {} (version {})", resolved(model.name()), model.version());
	let _ = writeln!(out, "  access: {:?}", model.access_flags());
	match model.super_name() {
		Ok(Some(name)) => { let _ = writeln!(out, "  extends {name}"); },
		Ok(None) => {},
		Err(e) => { let _ = writeln!(out, "  extends <{e}>"); },
	}
	for &index in model.interfaces() {
		let _ = writeln!(out, "  implements {}", resolved(model.pool().get_class_name(index)));
	}

	for field in model.fields() {
		let _ = writeln!(
			out,
			"  field {} {} {:?}",
			resolved(model.field_name(field)), resolved(model.field_descriptor(field)), field.access_flags,
		);
	}

	for method in model.methods() {
		let signature = match &method.signature {
			Ok(markers) => markers.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
			Err(e) => format!("<{e}>"),
		};
		let _ = writeln!(out, "  method {} [{signature}] {:?}", model.describe_method(method), method.access_flags);

		if let Some(code) = &method.code {
			let _ = writeln!(
				out,
				"    code: max stack {}, max locals {}, {} bytes",
				code.max_stack, code.max_locals, code.instructions.len(),
			);
			for handler in &code.exception_handlers {
				let catch_type = match &handler.catch_type {
					CatchType::Any => "any".to_owned(),
					CatchType::Class { name: Ok(name), .. } => name.clone(),
					CatchType::Class { index, name: Err(e) } => format!("<#{index}: {e}>"),
				};
				let _ = writeln!(
					out,
					"    handler {}..{} -> {} catches {catch_type}",
					handler.start_pc, handler.end_pc, handler.handler_pc,
				);
			}
		}
	}

	out
}
