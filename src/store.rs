/// State transition function used by a [`Store`].
///
/// Reducers must be pure: they compute the next state and describe any
/// visual consequence as an effect value. Applying the effect is the
/// caller's business.
pub trait Reducer {
    type State;
    type Action;
    type Effect;

    fn reduce(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Transition<Self::State, Self::Effect>;
}

/// Outcome of a single reduction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition<S, E> {
    next: Option<S>,
    effect: Option<E>,
}

impl<S, E> Transition<S, E> {
    /// Keeps the current state and produces no effect.
    pub const fn identity() -> Self {
        Self {
            next: None,
            effect: None,
        }
    }

    /// Replaces the state with `next`.
    pub const fn to(next: S) -> Self {
        Self {
            next: Some(next),
            effect: None,
        }
    }

    /// Attaches an effect to the transition.
    pub fn with_effect(mut self, effect: E) -> Self {
        self.effect = Some(effect);
        self
    }

    pub const fn next(&self) -> Option<&S> {
        self.next.as_ref()
    }

    pub const fn effect(&self) -> Option<&E> {
        self.effect.as_ref()
    }
}

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<S, E> = Box<dyn FnMut(&S, &E)>;

/// Minimal unidirectional state container with a single reducer.
///
/// State changes only through [`Store::dispatch`]. Subscribers run after the
/// new state is committed and only see shared references, so they cannot
/// dispatch back into the store.
pub struct Store<R: Reducer> {
    reducer: R,
    state: R::State,
    subscribers: Vec<(SubscriptionId, Subscriber<R::State, R::Effect>)>,
    next_subscription: u64,
    dispatched: u64,
}

impl<R: Reducer> Store<R> {
    pub fn new(reducer: R, initial: R::State) -> Self {
        Self {
            reducer,
            state: initial,
            subscribers: Vec::new(),
            next_subscription: 0,
            dispatched: 0,
        }
    }

    /// Returns the current state.
    #[inline]
    pub const fn state(&self) -> &R::State {
        &self.state
    }

    pub const fn reducer(&self) -> &R {
        &self.reducer
    }

    /// Number of actions dispatched so far, including identity transitions.
    pub const fn dispatch_count(&self) -> u64 {
        self.dispatched
    }

    /// Applies `action`, commits the next state and notifies subscribers.
    ///
    /// Returns the effect of the transition, if any.
    pub fn dispatch(&mut self, action: R::Action) -> Option<R::Effect> {
        let Transition { next, effect } = self.reducer.reduce(&self.state, &action);
        self.dispatched += 1;
        if let Some(next) = next {
            self.state = next;
        }
        if let Some(effect) = &effect {
            for (_, subscriber) in &mut self.subscribers {
                subscriber(&self.state, effect);
            }
        }
        effect
    }

    /// Registers a callback invoked after every transition that has an effect.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&R::State, &R::Effect) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Removes a subscriber; returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    enum CounterAction {
        Add(i32),
        Noop,
    }

    struct Counter;

    impl Reducer for Counter {
        type State = i32;
        type Action = CounterAction;
        type Effect = i32;

        fn reduce(&self, state: &i32, action: &CounterAction) -> Transition<i32, i32> {
            match action {
                CounterAction::Add(delta) => Transition::to(state + delta).with_effect(*delta),
                CounterAction::Noop => Transition::identity(),
            }
        }
    }

    #[test]
    fn dispatch_commits_and_returns_effect() {
        let mut store = Store::new(Counter, 1);
        assert_eq!(store.dispatch(CounterAction::Add(2)), Some(2));
        assert_eq!(*store.state(), 3);
        assert_eq!(store.dispatch(CounterAction::Noop), None);
        assert_eq!(*store.state(), 3);
        assert_eq!(store.dispatch_count(), 2);
    }

    #[test]
    fn subscribers_see_committed_state() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(Counter, 0);
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |state, effect| sink.borrow_mut().push((*state, *effect)));

        store.dispatch(CounterAction::Add(5));
        store.dispatch(CounterAction::Noop);
        store.dispatch(CounterAction::Add(-1));
        assert_eq!(*seen.borrow(), vec![(5, 5), (4, -1)]);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(CounterAction::Add(1));
        assert_eq!(seen.borrow().len(), 2);
    }
}
