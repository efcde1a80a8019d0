use serde::{Serialize, Deserialize};
use crate::domain::function::{ComputeDispatchDims, FunctionKind, ShaderProgram};
use std::fmt::Display;

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgramDto {
    pub root: String,
    pub kind: FunctionKind,
    pub functions: Vec<FunctionDto>,
    pub calls: Vec<CallDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FunctionDto {
    pub owner: String,
    pub name: String,
    pub kind: FunctionKind,
    pub return_type: String,
    pub parameters: Vec<ParameterDto>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dispatch: Option<ComputeDispatchDims>,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParameterDto {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallDto {
    pub from: String,
    pub to: String,
}

impl<B: Display> From<&ShaderProgram<B>> for ProgramDto {
    fn from(program: &ShaderProgram<B>) -> Self {
        let functions = program
            .functions
            .iter()
            .map(|f| {
                let record = &f.function;
                FunctionDto {
                    owner: record.type_name().to_string(),
                    name: record.name().to_string(),
                    kind: record.kind,
                    return_type: record.return_type.to_string(),
                    parameters: record
                        .parameters
                        .iter()
                        .map(|p| ParameterDto {
                            name: p.name.clone(),
                            type_: p.ty.to_string(),
                        })
                        .collect(),
                    dispatch: (record.kind == FunctionKind::ComputeEntryPoint).then_some(record.dispatch),
                    body: f.body.to_string(),
                }
            })
            .collect();

        let calls = program
            .calls
            .iter()
            .map(|(from, to)| CallDto {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect();

        ProgramDto {
            root: program.root.to_string(),
            kind: program.kind,
            functions,
            calls,
        }
    }
}
