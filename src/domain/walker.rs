//! Invocation walker: lists the functions a body calls.

use crate::domain::error::DiscoveryError;
use crate::domain::identity::FunctionIdentity;
use crate::ports::SymbolResolver;
use std::collections::HashSet;

pub struct InvocationWalker<'a, R> {
    resolver: &'a R,
}

impl<'a, R: SymbolResolver> InvocationWalker<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self { resolver }
    }

    /// Resolve every call in `body` to a callee identity.
    ///
    /// The result is deduplicated and keeps first-call order. A call that
    /// resolves to nothing is an error: dropping it would emit an incomplete
    /// shader.
    pub fn find_callees(
        &self,
        caller: &FunctionIdentity,
        body: &R::Body,
    ) -> Result<Vec<FunctionIdentity>, DiscoveryError> {
        let mut seen = HashSet::new();
        let mut callees = Vec::new();
        for call in self.resolver.call_expressions(body) {
            let callee = self
                .resolver
                .resolve_call(&call)
                .ok_or_else(|| DiscoveryError::UnresolvedCall {
                    caller: caller.clone(),
                    call: call.to_string(),
                })?;
            if seen.insert(callee.clone()) {
                callees.push(callee);
            }
        }
        Ok(callees)
    }
}
