//! Task-owned navigator with a command queue

use std::future;
use std::sync::Arc;

use slide_core::{
    CarouselConfig, CarouselState, IndexChange, IndexSubscriber, NavigationController,
    NavigationRequest, PointerEvent, PointerId, RejectReason, SlideCollection, SlideId,
    Transition,
};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use crate::clock::TokioClock;
use crate::error::DriverError;
use crate::source::SlideSource;

const COMMAND_QUEUE_DEPTH: usize = 64;
const INDEX_CHANGE_CAPACITY: usize = 32;

/// What the driver reports back for each command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Applied {
    pub transition: Transition,
    pub state: CarouselState,
    pub live_offset: Option<f32>,
}

#[derive(Debug)]
enum Input<P> {
    Navigate(NavigationRequest),
    GoToSlide(SlideId),
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    PointerCancel(PointerId),
    HoverEnter,
    HoverExit,
    ReplaceSlides(SlideCollection<P>),
}

struct Envelope<P> {
    input: Input<P>,
    reply: oneshot::Sender<Applied>,
}

/// Owns the driver task. Dropping it cancels the task.
#[derive(Debug)]
pub struct CarouselDriver {
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl CarouselDriver {
    /// Mount a carousel on the current tokio runtime
    pub fn spawn<P>(
        config: CarouselConfig,
        slides: SlideCollection<P>,
    ) -> Result<(Self, CarouselHandle<P>), DriverError>
    where
        P: Send + 'static,
    {
        let clock = TokioClock::new();
        let nav = NavigationController::new(config, slides, Arc::new(clock))?;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (state_tx, state_rx) = watch::channel(nav.state());
        let (stop_tx, stop_rx) = watch::channel(false);
        let (change_tx, _) = broadcast::channel(INDEX_CHANGE_CAPACITY);

        let forwarder: Arc<dyn IndexSubscriber> = Arc::new(ChangeForwarder {
            tx: change_tx.clone(),
        });
        nav.add_subscriber(forwarder.clone());

        let task = tokio::spawn(drive(nav, clock, forwarder, command_rx, state_tx, stop_rx));

        let handle = CarouselHandle {
            commands: command_tx,
            state: state_rx,
            changes: change_tx,
        };
        Ok((
            Self {
                stop_tx,
                task: Some(task),
            },
            handle,
        ))
    }

    /// Unmount and wait for the task to finish
    pub async fn shutdown(mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!("carousel driver task ended abnormally: {}", err);
            }
        }
    }
}

impl Drop for CarouselDriver {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Cloneable front end used by buttons, pointer listeners and the page
pub struct CarouselHandle<P> {
    commands: mpsc::Sender<Envelope<P>>,
    state: watch::Receiver<CarouselState>,
    changes: broadcast::Sender<IndexChange>,
}

impl<P> Clone for CarouselHandle<P> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            state: self.state.clone(),
            changes: self.changes.clone(),
        }
    }
}

impl<P> CarouselHandle<P>
where
    P: Send + 'static,
{
    /// Latest published state
    pub fn state(&self) -> CarouselState {
        *self.state.borrow()
    }

    /// Watch state changes, e.g. to redraw dots and arrows
    pub fn subscribe(&self) -> watch::Receiver<CarouselState> {
        self.state.clone()
    }

    /// Stream of index changes
    pub fn index_changes(&self) -> broadcast::Receiver<IndexChange> {
        self.changes.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    pub async fn submit(&self, request: NavigationRequest) -> Result<Applied, DriverError> {
        self.send(Input::Navigate(request)).await
    }

    pub async fn next(&self) -> Result<Applied, DriverError> {
        self.submit(NavigationRequest::Next).await
    }

    pub async fn prev(&self) -> Result<Applied, DriverError> {
        self.submit(NavigationRequest::Prev).await
    }

    pub async fn go_to(&self, target: usize) -> Result<Applied, DriverError> {
        self.submit(NavigationRequest::GoTo { target }).await
    }

    pub async fn go_to_slide(&self, id: SlideId) -> Result<Applied, DriverError> {
        self.send(Input::GoToSlide(id)).await
    }

    pub async fn pointer_down(&self, event: PointerEvent) -> Result<Applied, DriverError> {
        self.send(Input::PointerDown(event)).await
    }

    pub async fn pointer_move(&self, event: PointerEvent) -> Result<Applied, DriverError> {
        self.send(Input::PointerMove(event)).await
    }

    pub async fn pointer_up(&self, event: PointerEvent) -> Result<Applied, DriverError> {
        self.send(Input::PointerUp(event)).await
    }

    pub async fn pointer_cancel(&self, pointer: PointerId) -> Result<Applied, DriverError> {
        self.send(Input::PointerCancel(pointer)).await
    }

    pub async fn hover_enter(&self) -> Result<Applied, DriverError> {
        self.send(Input::HoverEnter).await
    }

    pub async fn hover_exit(&self) -> Result<Applied, DriverError> {
        self.send(Input::HoverExit).await
    }

    pub async fn replace_slides(&self, slides: SlideCollection<P>) -> Result<Applied, DriverError> {
        self.send(Input::ReplaceSlides(slides)).await
    }

    /// Fetch from `source`, drop inactive slides and swap them in.
    ///
    /// Loading happens on the caller's task so the command queue keeps
    /// flowing while the source is slow.
    pub async fn reload_from<S>(&self, source: &S) -> Result<Applied, DriverError>
    where
        S: SlideSource<P> + ?Sized,
    {
        let slides = source.load().await.map_err(|error| DriverError::Source {
            source_name: source.source_name().to_string(),
            error,
        })?;
        let slides = SlideCollection::new(slides)?.active_only();
        info!(
            source = source.source_name(),
            slides = slides.len(),
            "reloading slides"
        );
        self.replace_slides(slides).await
    }

    async fn send(&self, input: Input<P>) -> Result<Applied, DriverError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Envelope { input, reply })
            .await
            .map_err(|_| DriverError::Closed)?;
        response.await.map_err(|_| DriverError::Closed)
    }
}

struct ChangeForwarder {
    tx: broadcast::Sender<IndexChange>,
}

impl IndexSubscriber for ChangeForwarder {
    fn on_index_change(&self, change: &IndexChange) {
        // No receivers is fine
        let _ = self.tx.send(*change);
    }
}

async fn drive<P>(
    mut nav: NavigationController<P>,
    clock: TokioClock,
    _forwarder: Arc<dyn IndexSubscriber>,
    mut commands: mpsc::Receiver<Envelope<P>>,
    state_tx: watch::Sender<CarouselState>,
    mut stop_rx: watch::Receiver<bool>,
) {
    loop {
        let wakeup = nav.next_wakeup().map(|ms| clock.instant_at(ms));
        let sleep = async move {
            match wakeup {
                Some(at) => time::sleep_until(at).await,
                None => future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
            envelope = commands.recv() => {
                let Some(Envelope { input, reply }) = envelope else {
                    debug!("all carousel handles dropped");
                    break;
                };
                let transition = apply(&mut nav, input);
                let _ = reply.send(Applied {
                    transition,
                    state: nav.state(),
                    live_offset: nav.live_offset(),
                });
            }
            _ = sleep => {
                nav.poll();
            }
        }

        let current = nav.state();
        state_tx.send_if_modified(|published| {
            if *published == current {
                false
            } else {
                *published = current;
                true
            }
        });
    }

    nav.teardown();
    commands.close();
}

fn apply<P>(nav: &mut NavigationController<P>, input: Input<P>) -> Transition {
    match input {
        Input::Navigate(request) => nav.submit(request),
        Input::GoToSlide(id) => nav.go_to_slide(&id),
        Input::PointerDown(event) => {
            if nav.pointer_down(&event) {
                Transition::Unchanged
            } else {
                Transition::Rejected(RejectReason::NoGesture)
            }
        }
        Input::PointerMove(event) => match nav.pointer_move(&event) {
            Some(_) => Transition::Unchanged,
            None => Transition::Rejected(RejectReason::NoGesture),
        },
        Input::PointerUp(event) => nav.pointer_up(&event),
        Input::PointerCancel(pointer) => nav.pointer_cancel(pointer),
        Input::HoverEnter => {
            nav.hover_enter();
            Transition::Unchanged
        }
        Input::HoverExit => {
            nav.hover_exit();
            Transition::Unchanged
        }
        Input::ReplaceSlides(slides) => nav.replace_slides(slides),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;
    use async_trait::async_trait;
    use slide_core::Slide;
    use std::time::Duration;
    use tokio::sync::broadcast::error::TryRecvError;

    fn deck(n: usize) -> SlideCollection<String> {
        SlideCollection::new(
            (0..n)
                .map(|i| Slide::new(i as u64, format!("slide {}", i)))
                .collect(),
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_advances_on_period() {
        let (_driver, handle) = CarouselDriver::spawn(CarouselConfig::default(), deck(3)).unwrap();
        let mut changes = handle.index_changes();
        let started = time::Instant::now();

        let change = changes.recv().await.unwrap();
        assert_eq!((change.from, change.to), (0, 1));
        assert_eq!(change.cause, Some(NavigationRequest::AutoAdvance));
        assert!(started.elapsed() >= Duration::from_millis(5_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_navigation_suppresses_next_tick() {
        let (_driver, handle) = CarouselDriver::spawn(CarouselConfig::default(), deck(4)).unwrap();

        time::sleep(Duration::from_millis(4_000)).await;
        let applied = handle.next().await.unwrap();
        assert_eq!(applied.transition, Transition::Moved { from: 0, to: 1 });
        assert!(applied.state.is_paused);

        // Tick at 5s falls inside the 1.5s cooldown
        time::sleep(Duration::from_millis(2_000)).await;
        assert_eq!(handle.state().index, 1);
        assert!(!handle.state().is_paused);

        time::sleep(Duration::from_millis(4_001)).await;
        assert_eq!(handle.state().index, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drag_through_handle() {
        let (_driver, handle) = CarouselDriver::spawn(CarouselConfig::default(), deck(3)).unwrap();

        let applied = handle.pointer_down(PointerEvent::touch(1, 500.0)).await.unwrap();
        assert!(applied.state.is_dragging);

        time::sleep(Duration::from_millis(100)).await;
        let applied = handle.pointer_move(PointerEvent::touch(1, 470.0)).await.unwrap();
        assert_eq!(applied.live_offset, Some(-30.0));

        time::sleep(Duration::from_millis(200)).await;
        let applied = handle.pointer_up(PointerEvent::touch(1, 440.0)).await.unwrap();
        assert_eq!(applied.transition, Transition::Moved { from: 0, to: 1 });
        assert!(!applied.state.is_dragging);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_everything() {
        let (driver, handle) = CarouselDriver::spawn(CarouselConfig::default(), deck(3)).unwrap();
        let mut changes = handle.index_changes();

        time::sleep(Duration::from_millis(2_500)).await;
        driver.shutdown().await;
        time::sleep(Duration::from_millis(30_000)).await;

        assert!(matches!(
            changes.try_recv(),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed)
        ));
        assert!(matches!(handle.next().await, Err(DriverError::Closed)));
        assert!(handle.is_closed());
        assert_eq!(handle.state().index, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_driver_closes_handle() {
        let (driver, handle) = CarouselDriver::spawn(CarouselConfig::default(), deck(3)).unwrap();
        drop(driver);
        tokio::task::yield_now().await;

        assert!(matches!(handle.go_to(2).await, Err(DriverError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_filters_inactive_and_clamps() {
        let (_driver, handle) = CarouselDriver::spawn(CarouselConfig::journey(), deck(5)).unwrap();
        handle.go_to(4).await.unwrap();

        let source = StaticSource::new(
            "posters",
            vec![
                Slide::new(10u64, "a".to_string()),
                Slide::new(11u64, "b".to_string()).inactive(),
                Slide::new(12u64, "c".to_string()),
            ],
        );
        let applied = handle.reload_from(&source).await.unwrap();
        assert_eq!(applied.transition, Transition::Moved { from: 4, to: 1 });
        assert_eq!(applied.state.slide_count, 2);

        let applied = handle.go_to_slide(SlideId::from(10u64)).await.unwrap();
        assert_eq!(applied.state.index, 0);
    }

    struct FailingSource;

    #[async_trait]
    impl SlideSource<String> for FailingSource {
        async fn load(&self) -> anyhow::Result<Vec<Slide<String>>> {
            anyhow::bail!("posters fetch failed: 503")
        }

        fn source_name(&self) -> &str {
            "posters"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_reload_keeps_slides() {
        let (_driver, handle) = CarouselDriver::spawn(CarouselConfig::journey(), deck(3)).unwrap();

        let err = handle.reload_from(&FailingSource).await.unwrap_err();
        match err {
            DriverError::Source { source_name, error } => {
                assert_eq!(source_name, "posters");
                assert!(error.to_string().contains("503"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(handle.state().slide_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_rejected() {
        let config = CarouselConfig {
            autoplay_interval_ms: 0,
            ..CarouselConfig::default()
        };
        let result = CarouselDriver::spawn(config, deck(3));
        assert!(matches!(result, Err(DriverError::Carousel(_))));
    }
}
