//! Errors raised while discovering a shader's call graph.
//!
//! Every variant aborts the discovery session for that root; messages are
//! meant to be shown verbatim to the shader author.

use crate::domain::identity::FunctionIdentity;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// The requested entry point has no declaration.
    RootResolution { root: FunctionIdentity },
    /// A call inside a reachable function could not be resolved to a symbol.
    UnresolvedCall {
        caller: FunctionIdentity,
        call: String,
    },
    /// A reachable function calls an active ancestor. `cycle` runs from the
    /// re-entered function down to the caller that closes the loop.
    CyclicCall { cycle: Vec<FunctionIdentity> },
    /// The dispatch-dimension attribute does not have exactly three arguments.
    AttributeArity {
        function: FunctionIdentity,
        attribute: String,
        expected: usize,
        found: usize,
    },
    /// A dispatch-dimension argument is not an unsigned integer literal.
    AttributeFormat {
        function: FunctionIdentity,
        attribute: String,
        position: usize,
        argument: String,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::RootResolution { root } => {
                write!(f, "entry point `{}` has no resolvable declaration", root)
            }
            DiscoveryError::UnresolvedCall { caller, call } => {
                write!(f, "call `{}` in `{}` could not be resolved to a function", call, caller)
            }
            DiscoveryError::CyclicCall { cycle } => {
                let mut path: Vec<String> = cycle.iter().map(|id| id.to_string()).collect();
                if let Some(first) = cycle.first() {
                    path.push(first.to_string());
                }
                write!(
                    f,
                    "recursive call cycle detected, shader targets cannot recurse: {}",
                    path.join(" -> ")
                )
            }
            DiscoveryError::AttributeArity {
                function,
                attribute,
                expected,
                found,
            } => write!(
                f,
                "`{}` on `{}` takes {} arguments but {} were supplied",
                attribute, function, expected, found
            ),
            DiscoveryError::AttributeFormat {
                function,
                attribute,
                position,
                argument,
            } => write!(
                f,
                "argument {} of `{}` on `{}` is not an unsigned integer literal: `{}`",
                position + 1,
                attribute,
                function,
                argument
            ),
        }
    }
}

impl std::error::Error for DiscoveryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_closes_the_loop() {
        let err = DiscoveryError::CyclicCall {
            cycle: vec![FunctionIdentity::new("S", "a"), FunctionIdentity::new("S", "b")],
        };
        assert!(err.to_string().ends_with("S::a -> S::b -> S::a"));
    }

    #[test]
    fn test_format_message_is_one_based() {
        let err = DiscoveryError::AttributeFormat {
            function: FunctionIdentity::new("S", "cs"),
            attribute: "compute_shader".to_string(),
            position: 1,
            argument: "x".to_string(),
        };
        assert!(err.to_string().contains("argument 2"));
    }
}
