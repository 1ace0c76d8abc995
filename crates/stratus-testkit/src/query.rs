//! Scripted cloud query handler.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use stratus_core::{
    GroupFilter, ResourceId, ResourceQueryEffects, ResourceState, SecurityGroupRecord,
    StratusError, StratusResult,
};

#[derive(Debug, Default)]
struct QueryState {
    groups: Vec<SecurityGroupRecord>,
    list_error: Option<StratusError>,
    list_calls: usize,
    scripts: HashMap<ResourceId, VecDeque<StratusResult<ResourceState>>>,
    last_state: HashMap<ResourceId, ResourceState>,
    describe_calls: HashMap<ResourceId, usize>,
    control_error: Option<StratusError>,
    start_requests: Vec<ResourceId>,
    stop_requests: Vec<ResourceId>,
}

/// In-memory [`ResourceQueryEffects`] with scripted state sequences.
///
/// Each `describe_resource_state` call consumes the next scripted entry for
/// the resource. Once the script is exhausted the last successful state is
/// repeated; a resource with no successful state reports `NotFound`.
#[derive(Debug, Default)]
pub struct MockResourceQuery {
    state: Mutex<QueryState>,
}

impl MockResourceQuery {
    /// Empty account: no groups, no resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Security groups returned by `list_security_groups`.
    pub fn with_groups(self, groups: Vec<SecurityGroupRecord>) -> Self {
        self.state.lock().groups = groups;
        self
    }

    /// Make `list_security_groups` fail with `error`.
    pub fn with_list_error(self, error: StratusError) -> Self {
        self.state.lock().list_error = Some(error);
        self
    }

    /// Make `start_resource` and `stop_resource` fail with `error`.
    pub fn with_control_error(self, error: StratusError) -> Self {
        self.state.lock().control_error = Some(error);
        self
    }

    /// Script the successive states observed for `resource`.
    pub fn with_states<I>(self, resource: impl Into<ResourceId>, states: I) -> Self
    where
        I: IntoIterator<Item = ResourceState>,
    {
        self.with_script(resource, states.into_iter().map(Ok))
    }

    /// Script successive describe results, failures included.
    pub fn with_script<I>(self, resource: impl Into<ResourceId>, script: I) -> Self
    where
        I: IntoIterator<Item = StratusResult<ResourceState>>,
    {
        self.state
            .lock()
            .scripts
            .entry(resource.into())
            .or_default()
            .extend(script);
        self
    }

    /// Number of `describe_resource_state` calls for `resource`.
    pub fn describe_calls(&self, resource: &ResourceId) -> usize {
        self.state
            .lock()
            .describe_calls
            .get(resource)
            .copied()
            .unwrap_or(0)
    }

    /// Number of `list_security_groups` calls.
    pub fn list_calls(&self) -> usize {
        self.state.lock().list_calls
    }

    /// Resources passed to `start_resource`, in order.
    pub fn start_requests(&self) -> Vec<ResourceId> {
        self.state.lock().start_requests.clone()
    }

    /// Resources passed to `stop_resource`, in order.
    pub fn stop_requests(&self) -> Vec<ResourceId> {
        self.state.lock().stop_requests.clone()
    }
}

#[async_trait]
impl ResourceQueryEffects for MockResourceQuery {
    async fn list_security_groups(
        &self,
        filter: &GroupFilter,
    ) -> StratusResult<Vec<SecurityGroupRecord>> {
        let mut state = self.state.lock();
        state.list_calls += 1;
        if let Some(error) = &state.list_error {
            return Err(error.clone());
        }
        Ok(state
            .groups
            .iter()
            .filter(|record| filter.selects(record))
            .cloned()
            .collect())
    }

    async fn describe_resource_state(&self, resource: &ResourceId) -> StratusResult<ResourceState> {
        let mut state = self.state.lock();
        *state.describe_calls.entry(resource.clone()).or_default() += 1;

        let next = state
            .scripts
            .get_mut(resource)
            .and_then(|script| script.pop_front());
        match next {
            Some(Ok(observed)) => {
                state.last_state.insert(resource.clone(), observed);
                Ok(observed)
            }
            Some(Err(error)) => Err(error),
            None => state
                .last_state
                .get(resource)
                .copied()
                .ok_or_else(|| StratusError::not_found(format!("resource {resource}"))),
        }
    }

    async fn start_resource(&self, resource: &ResourceId) -> StratusResult<()> {
        let mut state = self.state.lock();
        if let Some(error) = &state.control_error {
            return Err(error.clone());
        }
        state.start_requests.push(resource.clone());
        Ok(())
    }

    async fn stop_resource(&self, resource: &ResourceId) -> StratusResult<()> {
        let mut state = self.state.lock();
        if let Some(error) = &state.control_error {
            return Err(error.clone());
        }
        state.stop_requests.push(resource.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ssh_and_web_records;

    #[tokio::test]
    async fn test_script_then_repeat_last() {
        let id = ResourceId::new("i-1");
        let query = MockResourceQuery::new().with_script(
            "i-1",
            vec![
                Ok(ResourceState::Pending),
                Err(StratusError::query("throttled")),
                Ok(ResourceState::Running),
            ],
        );

        assert_eq!(query.describe_resource_state(&id).await, Ok(ResourceState::Pending));
        assert!(query.describe_resource_state(&id).await.is_err());
        assert_eq!(query.describe_resource_state(&id).await, Ok(ResourceState::Running));
        assert_eq!(query.describe_resource_state(&id).await, Ok(ResourceState::Running));
        assert_eq!(query.describe_calls(&id), 4);
    }

    #[tokio::test]
    async fn test_unknown_resource_is_not_found() {
        let query = MockResourceQuery::new();
        let err = query
            .describe_resource_state(&ResourceId::new("i-missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, StratusError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_applies_filter() {
        let query = MockResourceQuery::new().with_groups(ssh_and_web_records());
        let all = query.list_security_groups(&GroupFilter::all()).await.unwrap();
        let web = query
            .list_security_groups(&GroupFilter::by_ids(["sg-web"]))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(web.len(), 1);
        assert_eq!(web[0].group_id, "sg-web");
        assert_eq!(query.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_control_requests_recorded() {
        let query = MockResourceQuery::new();
        let id = ResourceId::new("i-1");
        query.start_resource(&id).await.unwrap();
        query.stop_resource(&id).await.unwrap();
        assert_eq!(query.start_requests(), vec![id.clone()]);
        assert_eq!(query.stop_requests(), vec![id]);
    }
}
