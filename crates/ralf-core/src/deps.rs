//! Dependency ordering of components.
//!
//! Depth-first, post-order traversal over `depends_on` edges starting from
//! each component in declaration order. The walk uses an explicit stack so
//! deep dependency chains cannot overflow the call stack. Independent
//! components keep their declaration order.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Return `components` ordered so that every component follows all of
/// its dependencies.
///
/// Fails with [`CoreError::Cycle`] when a dependency cycle exists and with
/// [`CoreError::UnknownDependency`] when a component names a dependency
/// that is not in the set.
pub fn resolve_dependencies(components: &[Component]) -> CoreResult<Vec<Component>> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(components.len());
    for (i, component) in components.iter().enumerate() {
        if index.insert(component.name.as_str(), i).is_some() {
            return Err(CoreError::DuplicateComponent(component.name.clone()));
        }
    }

    let mut marks = vec![Mark::Unvisited; components.len()];
    let mut order: Vec<usize> = Vec::with_capacity(components.len());
    // (component index, next dependency to visit)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..components.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::InProgress;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (current, cursor) = *frame;
            let component = &components[current];

            let Some(dependency) = component.depends_on.get(cursor) else {
                stack.pop();
                marks[current] = Mark::Done;
                order.push(current);
                continue;
            };
            frame.1 += 1;

            let &next = index.get(dependency.as_str()).ok_or_else(|| {
                CoreError::UnknownDependency {
                    component: component.name.clone(),
                    dependency: dependency.clone(),
                }
            })?;

            match marks[next] {
                Mark::Done => {}
                Mark::InProgress => {
                    return Err(CoreError::Cycle {
                        component: dependency.clone(),
                    });
                }
                Mark::Unvisited => {
                    marks[next] = Mark::InProgress;
                    stack.push((next, 0));
                }
            }
        }
    }

    let resolved: Vec<Component> = order.into_iter().map(|i| components[i].clone()).collect();
    debug!(
        order = ?resolved.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        "resolved component order"
    );
    Ok(resolved)
}
