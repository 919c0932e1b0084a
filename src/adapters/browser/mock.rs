//! Scripted browser session for tests
//!
//! Pages are modelled as a set of locators that are either present or absent.
//! Presence can change over successive lookups (to simulate a loader that
//! appears then clears) or in reaction to clicks and refreshes (to simulate
//! an export button that drops a file into the download directory).

use super::locator::Locator;
use super::traits::BrowserSession;
use crate::domain::{BrowserError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// A call made against the mock, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCall {
    Navigate(String),
    Refresh,
    Click(Locator),
    TypeInto(Locator, String),
    RunScript(String),
    Quit,
}

/// Side effect triggered by a click or a refresh
#[derive(Debug, Clone)]
pub enum MockAction {
    /// Create a file, as the browser's download manager would
    WriteFile { dir: PathBuf, name: String },
    /// Make a locator present from now on
    Show(Locator),
    /// Make a locator absent from now on
    Hide(Locator),
    /// Make a locator present for one lookup, then absent
    Flash(Locator),
}

/// Element handle returned by [`MockBrowser`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    locator: Locator,
}

impl MockElement {
    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

type LocatorMatcher = Box<dyn Fn(&Locator) -> bool + Send + Sync>;

#[derive(Default)]
struct MockState {
    presence: HashMap<Locator, VecDeque<bool>>,
    matchers: Vec<LocatorMatcher>,
    unclickable: HashSet<Locator>,
    on_click: HashMap<Locator, Vec<MockAction>>,
    on_refresh: Vec<MockAction>,
    on_script: Vec<(String, MockAction)>,
    calls: Vec<BrowserCall>,
}

/// In-memory [`BrowserSession`] with scripted page state
#[derive(Default)]
pub struct MockBrowser {
    state: Mutex<MockState>,
    terminated: AtomicBool,
}

impl MockBrowser {
    /// Creates a mock on which nothing is present
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks a locator as always present
    #[must_use]
    pub fn with_element(self, locator: Locator) -> Self {
        self.set_presence(locator, [true]);
        self
    }

    /// Scripts successive lookups of a locator; the last value repeats
    #[must_use]
    pub fn with_presence(self, locator: Locator, sequence: impl IntoIterator<Item = bool>) -> Self {
        self.set_presence(locator, sequence);
        self
    }

    /// Treats every locator accepted by `matcher` as present unless a
    /// presence sequence says otherwise
    #[must_use]
    pub fn with_matcher(self, matcher: impl Fn(&Locator) -> bool + Send + Sync + 'static) -> Self {
        self.state().matchers.push(Box::new(matcher));
        self
    }

    /// Makes a present locator report as not clickable
    #[must_use]
    pub fn with_unclickable(self, locator: Locator) -> Self {
        self.state().unclickable.insert(locator);
        self
    }

    /// Runs `action` every time the element at `locator` is clicked
    #[must_use]
    pub fn on_click(self, locator: Locator, action: MockAction) -> Self {
        self.state().on_click.entry(locator).or_default().push(action);
        self
    }

    /// Runs `action` on every page refresh
    #[must_use]
    pub fn on_refresh(self, action: MockAction) -> Self {
        self.state().on_refresh.push(action);
        self
    }

    /// Runs `action` whenever an executed script contains `fragment`
    #[must_use]
    pub fn on_script(self, fragment: impl Into<String>, action: MockAction) -> Self {
        self.state().on_script.push((fragment.into(), action));
        self
    }

    pub fn set_presence(&self, locator: Locator, sequence: impl IntoIterator<Item = bool>) {
        let mut sequence: VecDeque<bool> = sequence.into_iter().collect();
        if sequence.is_empty() {
            sequence.push_back(false);
        }
        self.state().presence.insert(locator, sequence);
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<BrowserCall> {
        self.state().calls.clone()
    }

    pub fn click_count(&self, locator: &Locator) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, BrowserCall::Click(l) if l == locator))
            .count()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                BrowserCall::Navigate(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                BrowserCall::RunScript(script) => Some(script.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn refresh_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, BrowserCall::Refresh))
            .count()
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.is_terminated() {
            return Err(BrowserError::SessionTerminated("mock session closed".to_string()).into());
        }
        Ok(())
    }

    fn apply(state: &mut MockState, actions: Vec<MockAction>) -> Result<()> {
        for action in actions {
            match action {
                MockAction::WriteFile { dir, name } => {
                    std::fs::write(dir.join(&name), b"id,name\n1,test\n")?;
                }
                MockAction::Show(locator) => {
                    state.presence.insert(locator, VecDeque::from([true]));
                }
                MockAction::Hide(locator) => {
                    state.presence.insert(locator, VecDeque::from([false]));
                }
                MockAction::Flash(locator) => {
                    state.presence.insert(locator, VecDeque::from([true, false]));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for MockBrowser {
    type Element = MockElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.ensure_alive()?;
        self.state().calls.push(BrowserCall::Navigate(url.to_string()));
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        self.ensure_alive()?;
        let mut state = self.state();
        state.calls.push(BrowserCall::Refresh);
        let actions = state.on_refresh.clone();
        Self::apply(&mut state, actions)
    }

    async fn locate(&self, locator: &Locator) -> Result<Option<MockElement>> {
        self.ensure_alive()?;
        let mut guard = self.state();
        let state = &mut *guard;
        let present = match state.presence.get_mut(locator) {
            Some(sequence) if sequence.len() > 1 => sequence.pop_front().unwrap_or(false),
            Some(sequence) => sequence.front().copied().unwrap_or(false),
            None => state.matchers.iter().any(|m| m(locator)),
        };
        Ok(present.then(|| MockElement {
            locator: locator.clone(),
        }))
    }

    async fn is_clickable(&self, element: &MockElement) -> Result<bool> {
        self.ensure_alive()?;
        Ok(!self.state().unclickable.contains(&element.locator))
    }

    async fn click(&self, element: &MockElement) -> Result<()> {
        self.ensure_alive()?;
        let mut state = self.state();
        state.calls.push(BrowserCall::Click(element.locator.clone()));
        let actions = state
            .on_click
            .get(&element.locator)
            .cloned()
            .unwrap_or_default();
        Self::apply(&mut state, actions)
    }

    async fn type_into(&self, element: &MockElement, text: &str) -> Result<()> {
        self.ensure_alive()?;
        self.state()
            .calls
            .push(BrowserCall::TypeInto(element.locator.clone(), text.to_string()));
        Ok(())
    }

    async fn run_script(&self, script: &str) -> Result<()> {
        self.ensure_alive()?;
        let mut state = self.state();
        state.calls.push(BrowserCall::RunScript(script.to_string()));
        let actions: Vec<MockAction> = state
            .on_script
            .iter()
            .filter(|(fragment, _)| script.contains(fragment.as_str()))
            .map(|(_, action)| action.clone())
            .collect();
        Self::apply(&mut state, actions)
    }

    async fn quit(&self) -> Result<()> {
        if !self.terminated.swap(true, Ordering::SeqCst) {
            self.state().calls.push(BrowserCall::Quit);
        }
        Ok(())
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}
