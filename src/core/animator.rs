use crate::core::visibility::{VisibilityWatcher, WatchId};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    None,
    TranslateX(f32),
    TranslateY(f32),
    Scale(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub opacity: f32,
    pub transform: Transform,
    pub class: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    FadeUp { offset_px: f32 },
    SlideInLeft { offset_px: f32 },
    ScaleIn { from: f32 },
    FadeIn,
}

impl Effect {
    pub fn initial(&self) -> VisualState {
        let transform = match *self {
            Effect::FadeUp { offset_px } => Transform::TranslateY(offset_px),
            Effect::SlideInLeft { offset_px } => Transform::TranslateX(-offset_px),
            Effect::ScaleIn { from } => Transform::Scale(from),
            Effect::FadeIn => Transform::None,
        };
        VisualState {
            opacity: 0.0,
            transform,
            class: None,
        }
    }

    pub fn terminal(&self) -> VisualState {
        let (transform, class) = match self {
            Effect::FadeUp { .. } => (Transform::TranslateY(0.0), "fade-in"),
            Effect::SlideInLeft { .. } => (Transform::TranslateX(0.0), "slide-in-left"),
            Effect::ScaleIn { .. } => (Transform::Scale(1.0), "scale-in"),
            Effect::FadeIn => (Transform::None, "bounce"),
        };
        VisualState {
            opacity: 1.0,
            transform,
            class: Some(class),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationProfile {
    pub name: &'static str,
    pub threshold: f32,
    pub stagger: Duration,
    pub effect: Effect,
    pub transition: Duration,
}

impl AnimationProfile {
    pub fn cards() -> Self {
        Self {
            name: "cards",
            threshold: 0.1,
            stagger: Duration::from_millis(100),
            effect: Effect::FadeUp { offset_px: 30.0 },
            transition: Duration::from_millis(600),
        }
    }

    pub fn timeline() -> Self {
        Self {
            name: "timeline",
            threshold: 0.2,
            stagger: Duration::from_millis(150),
            effect: Effect::SlideInLeft { offset_px: 30.0 },
            transition: Duration::from_millis(800),
        }
    }

    pub fn team() -> Self {
        Self {
            name: "team",
            threshold: 0.2,
            stagger: Duration::from_millis(100),
            effect: Effect::ScaleIn { from: 0.8 },
            transition: Duration::from_millis(600),
        }
    }

    pub fn contact() -> Self {
        Self {
            name: "contact",
            threshold: 0.3,
            stagger: Duration::from_millis(200),
            effect: Effect::FadeIn,
            transition: Duration::from_millis(600),
        }
    }

    /// 數字統計，進入畫面一半時開始計數
    pub fn counters() -> Self {
        Self {
            name: "counters",
            threshold: 0.5,
            stagger: Duration::ZERO,
            effect: Effect::FadeIn,
            transition: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, index: usize) -> Duration {
        self.stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTarget {
    pub element: String,
    pub group: GroupId,
    pub index: usize,
    pub delay: Duration,
    pub state: VisualState,
    revealed: bool,
    watch: WatchId,
}

impl AnimationTarget {
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    pub target: TargetId,
    pub element: String,
    pub group: GroupId,
    pub index: usize,
    pub due_at: Instant,
    pub state: VisualState,
}

#[derive(Debug, PartialEq, Eq)]
struct PendingReveal {
    due_at: Instant,
    index: usize,
    seq: u64,
    target: TargetId,
}

impl PartialOrd for PendingReveal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingReveal {
    fn cmp(&self, other: &Self) -> Ordering {
        // 反向比較，讓 BinaryHeap 變成最早到期者優先
        other
            .due_at
            .cmp(&self.due_at)
            .then_with(|| other.index.cmp(&self.index))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// 捲動觸發的顯示排程：元素第一次可見時，於 index × stagger 之後套用終態
#[derive(Debug, Default)]
pub struct Animator {
    profiles: Vec<AnimationProfile>,
    targets: Vec<AnimationTarget>,
    watcher: VisibilityWatcher<TargetId>,
    queue: BinaryHeap<PendingReveal>,
    next_seq: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&mut self, profile: AnimationProfile) -> GroupId {
        self.profiles.push(profile);
        GroupId(self.profiles.len() - 1)
    }

    pub fn profile(&self, group: GroupId) -> Option<&AnimationProfile> {
        self.profiles.get(group.0)
    }

    /// group 必須來自本 animator 的 add_group
    pub fn register(&mut self, element: impl Into<String>, group: GroupId, index: usize) -> TargetId {
        let profile = &self.profiles[group.0];
        let id = TargetId(self.targets.len());
        let watch = self.watcher.watch(profile.threshold, id);
        self.targets.push(AnimationTarget {
            element: element.into(),
            group,
            index,
            delay: profile.delay_for(index),
            state: profile.effect.initial(),
            revealed: false,
            watch,
        });
        id
    }

    pub fn register_all<I, S>(&mut self, group: GroupId, elements: I) -> Vec<TargetId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| self.register(element, group, index))
            .collect()
    }

    pub fn target(&self, id: TargetId) -> Option<&AnimationTarget> {
        self.targets.get(id.0)
    }

    pub fn is_watching(&self, id: TargetId) -> bool {
        self.targets
            .get(id.0)
            .is_some_and(|t| self.watcher.is_watching(t.watch))
    }

    /// 交集回呼；第一次達到門檻時排程顯示並停止觀察，回傳是否有排程
    pub fn on_intersection(&mut self, id: TargetId, visible_fraction: f32, now: Instant) -> bool {
        let Some(target) = self.targets.get(id.0) else {
            return false;
        };
        if self.watcher.report(target.watch, visible_fraction).is_none() {
            return false;
        }

        let due_at = now + target.delay;
        tracing::debug!(
            "Element '{}' visible ({:.0}%), reveal in {:?}",
            target.element,
            visible_fraction * 100.0,
            target.delay
        );
        self.next_seq += 1;
        self.queue.push(PendingReveal {
            due_at,
            index: target.index,
            seq: self.next_seq,
            target: id,
        });
        true
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.queue.peek().map(|p| p.due_at)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn advance(&mut self, now: Instant) -> Vec<Reveal> {
        let mut revealed = Vec::new();
        while self.queue.peek().is_some_and(|p| p.due_at <= now) {
            let Some(pending) = self.queue.pop() else {
                break;
            };
            let Some(target) = self.targets.get_mut(pending.target.0) else {
                continue;
            };
            if target.revealed {
                continue;
            }
            let Some(profile) = self.profiles.get(target.group.0) else {
                continue;
            };

            target.revealed = true;
            target.state = profile.effect.terminal();
            revealed.push(Reveal {
                target: pending.target,
                element: target.element.clone(),
                group: target.group,
                index: target.index,
                due_at: pending.due_at,
                state: target.state,
            });
        }
        revealed
    }

    /// 依序等到每個排程時間並套用，直到佇列清空
    pub async fn run_pending(&mut self) -> Vec<Reveal> {
        let mut revealed = Vec::new();
        while let Some(due_at) = self.next_due() {
            tokio::time::sleep_until(due_at).await;
            revealed.extend(self.advance(Instant::now()));
        }
        revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_targets_start_hidden() {
        let mut animator = Animator::new();
        let team = animator.add_group(AnimationProfile::team());
        let id = animator.register("team-0", team, 0);

        let target = animator.target(id).unwrap();
        assert_eq!(target.state.opacity, 0.0);
        assert_eq!(target.state.transform, Transform::Scale(0.8));
        assert!(!target.is_revealed());
        assert!(animator.is_watching(id));
    }

    #[test]
    fn test_stagger_delay_per_group() {
        let mut animator = Animator::new();
        let cards = animator.add_group(AnimationProfile::cards());
        let timeline = animator.add_group(AnimationProfile::timeline());
        let contact = animator.add_group(AnimationProfile::contact());

        let c = animator.register("card-3", cards, 3);
        let t = animator.register("timeline-2", timeline, 2);
        let k = animator.register("contact-1", contact, 1);

        assert_eq!(animator.target(c).unwrap().delay, Duration::from_millis(300));
        assert_eq!(animator.target(t).unwrap().delay, Duration::from_millis(300));
        assert_eq!(animator.target(k).unwrap().delay, Duration::from_millis(200));
    }

    #[test]
    fn test_below_threshold_does_not_trigger() {
        let mut animator = Animator::new();
        let contact = animator.add_group(AnimationProfile::contact());
        let id = animator.register("contact-0", contact, 0);
        let now = Instant::now();

        assert!(!animator.on_intersection(id, 0.29, now));
        assert!(animator.is_watching(id));
        assert!(animator.on_intersection(id, 0.3, now));
        assert!(!animator.is_watching(id));
    }

    #[test]
    fn test_reveal_applies_once() {
        let mut animator = Animator::new();
        let cards = animator.add_group(AnimationProfile::cards());
        let id = animator.register("card-1", cards, 1);
        let now = Instant::now();

        assert!(animator.on_intersection(id, 0.5, now));
        assert!(!animator.on_intersection(id, 0.9, now));
        assert!(!animator.on_intersection(id, 1.0, now + Duration::from_millis(50)));
        assert_eq!(animator.pending(), 1);

        assert!(animator.advance(now + Duration::from_millis(99)).is_empty());
        let reveals = animator.advance(now + Duration::from_millis(100));
        assert_eq!(reveals.len(), 1);
        assert_eq!(reveals[0].state.class, Some("fade-in"));
        assert_eq!(reveals[0].state.opacity, 1.0);

        assert!(!animator.on_intersection(id, 1.0, now + Duration::from_secs(5)));
        assert!(animator.advance(now + Duration::from_secs(10)).is_empty());
        assert!(animator.target(id).unwrap().is_revealed());
    }

    #[test]
    fn test_batch_reveals_follow_registration_index() {
        let mut animator = Animator::new();
        let timeline = animator.add_group(AnimationProfile::timeline());
        let ids = animator.register_all(timeline, ["2009", "2014", "2019", "2024"]);
        let now = Instant::now();

        // intersection callbacks arrive in reverse document order
        for id in ids.iter().rev() {
            assert!(animator.on_intersection(*id, 1.0, now));
        }

        let reveals = animator.advance(now + Duration::from_secs(1));
        let order: Vec<usize> = reveals.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert!(reveals.windows(2).all(|w| w[0].due_at <= w[1].due_at));
        assert_eq!(reveals[3].due_at - now, Duration::from_millis(450));
        assert_eq!(reveals[0].state.transform, Transform::TranslateX(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_pending_waits_for_each_delay() {
        let mut animator = Animator::new();
        let contact = animator.add_group(AnimationProfile::contact());
        let ids = animator.register_all(contact, ["email", "phone", "office"]);
        let started = Instant::now();

        for id in &ids {
            animator.on_intersection(*id, 0.6, started);
        }
        let reveals = animator.run_pending().await;

        assert_eq!(reveals.len(), 3);
        assert!(started.elapsed() >= Duration::from_millis(400));
        assert_eq!(animator.pending(), 0);
        assert!(ids.iter().all(|id| animator.target(*id).unwrap().is_revealed()));
    }
}
