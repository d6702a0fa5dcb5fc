//! Slice ranges and slice views
//!
//! A slice is a window `[start, stop)` stepped by `step` over a parent list.
//! Views never fetch on their own: every read goes through the parent's
//! growth algorithm, with the parent's page size.
//!
//! Negative bounds and negative steps are resolved Python-style, but only
//! when the parent's final length is already known. Against a source of
//! unknown length they are rejected before anything is fetched.

use super::async_list::AsyncLazyPagedList;
use super::list::LazyPagedList;
use crate::error::{Error, Result};
use crate::fetch::{AsyncPageFetcher, PageFetcher};
use futures::stream::{self, Stream};
use std::iter::FusedIterator;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::pin::Pin;

// ============================================================================
// Slice Range
// ============================================================================

/// Requested slice bounds, each optional like `list[start:stop:step]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceRange {
    /// First position (default 0, or the end for negative steps)
    pub start: Option<isize>,
    /// Exclusive end position (default: end of the list)
    pub stop: Option<isize>,
    /// Distance between positions (default 1)
    pub step: Option<isize>,
}

impl SliceRange {
    /// Create a slice range
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// Set the step
    #[must_use]
    pub fn step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }
}

impl From<Range<usize>> for SliceRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(Some(clamp_bound(range.start)), Some(clamp_bound(range.end)), None)
    }
}

impl From<RangeFrom<usize>> for SliceRange {
    fn from(range: RangeFrom<usize>) -> Self {
        Self::new(Some(clamp_bound(range.start)), None, None)
    }
}

impl From<RangeTo<usize>> for SliceRange {
    fn from(range: RangeTo<usize>) -> Self {
        Self::new(None, Some(clamp_bound(range.end)), None)
    }
}

/// Positions past `isize::MAX` are past the end of any list
fn clamp_bound(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

impl From<RangeFull> for SliceRange {
    fn from(_: RangeFull) -> Self {
        Self::default()
    }
}

// ============================================================================
// Slice Plan
// ============================================================================

/// Resolved slice: element `k` lives at parent position `start + k * step`
///
/// `bound` caps the number of elements. For forward plans over a source of
/// unknown length the source may run out earlier; backward plans are only
/// built against a known length, so their bound is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicePlan {
    start: usize,
    step: isize,
    bound: Option<usize>,
}

impl SlicePlan {
    /// Resolve `range` against a parent
    ///
    /// `known_len` is the parent's final length when it is already known,
    /// `bounded` tells whether the parent can only ever hold finitely many
    /// items (a limit or a bounded slice).
    pub fn resolve(range: SliceRange, known_len: Option<usize>, bounded: bool) -> Result<Self> {
        let step = range.step.unwrap_or(1);
        if step == 0 {
            return Err(Error::invalid_operation("slice step cannot be zero"));
        }

        match known_len {
            Some(len) => Ok(Self::resolve_known(range, step, len)),
            None => Self::resolve_unknown(range, step, bounded),
        }
    }

    fn resolve_known(range: SliceRange, step: isize, len: usize) -> Self {
        let len = len as isize;
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
        let clamp = |value: isize| {
            if value < 0 {
                (value + len).max(lower)
            } else {
                value.min(upper)
            }
        };

        let start = range
            .start
            .map_or(if step < 0 { upper } else { lower }, clamp);
        let stop = range.stop.map_or(if step < 0 { lower } else { upper }, clamp);

        let count = if step > 0 && stop > start {
            (stop - start).unsigned_abs().div_ceil(step.unsigned_abs())
        } else if step < 0 && start > stop {
            (start - stop).unsigned_abs().div_ceil(step.unsigned_abs())
        } else {
            0
        };

        Self {
            start: if count == 0 { 0 } else { start as usize },
            step,
            bound: Some(count),
        }
    }

    fn resolve_unknown(range: SliceRange, step: isize, bounded: bool) -> Result<Self> {
        if step < 0 {
            return Err(Error::invalid_operation(
                "negative slice step requires a list of known length",
            ));
        }
        let start = non_negative(range.start, "start")?.unwrap_or(0);
        let stop = non_negative(range.stop, "stop")?;
        if step > 1 && stop.is_none() && !bounded {
            return Err(Error::invalid_operation(
                "slice step other than 1 requires a stop on an unbounded list",
            ));
        }

        let step_len = step.unsigned_abs();
        Ok(Self {
            start,
            step,
            bound: stop.map(|stop| stop.saturating_sub(start).div_ceil(step_len)),
        })
    }

    /// Resolve `range` relative to this plan and express it in parent positions
    pub fn compose(
        &self,
        range: SliceRange,
        known_len: Option<usize>,
        bounded: bool,
    ) -> Result<Self> {
        let inner = Self::resolve(range, known_len, bounded || self.bound.is_some())?;
        let step = self
            .step
            .checked_mul(inner.step)
            .ok_or_else(|| Error::invalid_operation("combined slice step overflows"))?;

        let bound = match (inner.bound, self.bound) {
            (inner_bound, Some(outer)) if inner.step > 0 => {
                let reachable = outer
                    .saturating_sub(inner.start)
                    .div_ceil(inner.step.unsigned_abs());
                Some(inner_bound.map_or(reachable, |b| b.min(reachable)))
            }
            (inner_bound, _) => inner_bound,
        };
        let start = isize::try_from(inner.start)
            .ok()
            .and_then(|offset| offset.checked_mul(self.step))
            .and_then(|offset| (self.start as isize).checked_add(offset))
            .and_then(|start| usize::try_from(start).ok());
        match start {
            Some(start) if bound != Some(0) => Ok(Self { start, step, bound }),
            // Starts outside the parent select nothing
            _ => Ok(Self {
                start: 0,
                step,
                bound: Some(0),
            }),
        }
    }

    /// Parent position of element `k`, if `k` is within the bound
    pub fn position(&self, k: usize) -> Option<usize> {
        if self.bound.is_some_and(|bound| k >= bound) {
            return None;
        }
        let offset = isize::try_from(k).ok()?.checked_mul(self.step)?;
        let position = (self.start as isize).checked_add(offset)?;
        usize::try_from(position).ok()
    }

    /// Upper bound on the number of elements
    pub fn bound(&self) -> Option<usize> {
        self.bound
    }

    /// Number of elements given the parent's final length
    pub fn count_within(&self, parent_len: usize) -> usize {
        if self.step < 0 {
            return self.bound.unwrap_or(0);
        }
        let available = parent_len
            .saturating_sub(self.start)
            .div_ceil(self.step.unsigned_abs());
        self.bound.map_or(available, |bound| bound.min(available))
    }
}

fn non_negative(value: Option<isize>, name: &str) -> Result<Option<usize>> {
    match value {
        Some(v) if v < 0 => Err(Error::invalid_operation(format!(
            "negative slice {name} ({v}) requires a list of known length"
        ))),
        Some(v) => Ok(Some(v as usize)),
        None => Ok(None),
    }
}

// ============================================================================
// Sync Slice View
// ============================================================================

/// Read-only window over a [`LazyPagedList`]
pub struct SliceView<'a, F: PageFetcher> {
    list: &'a LazyPagedList<F>,
    plan: SlicePlan,
}

impl<'a, F: PageFetcher> SliceView<'a, F> {
    pub(crate) fn new(list: &'a LazyPagedList<F>, plan: SlicePlan) -> Self {
        Self { list, plan }
    }

    /// The parent list
    pub fn parent(&self) -> &'a LazyPagedList<F> {
        self.list
    }

    /// The resolved plan
    pub fn plan(&self) -> SlicePlan {
        self.plan
    }

    /// Final length of the slice if the parent's length is already known
    pub fn known_len(&self) -> Option<usize> {
        self.list
            .known_len()
            .map(|len| self.plan.count_within(len))
    }

    /// Number of elements in the slice (eager)
    pub fn len(&self) -> Result<usize> {
        if let Some(len) = self.known_len() {
            return Ok(len);
        }
        Ok(self.plan.count_within(self.list.len()?))
    }

    /// Slice this slice; positions are relative to the view
    pub fn slice(&self, range: impl Into<SliceRange>) -> Result<SliceView<'a, F>> {
        let bounded = self.list.limit().is_some();
        let plan = self.plan.compose(range.into(), self.known_len(), bounded)?;
        Ok(SliceView::new(self.list, plan))
    }
}

impl<'a, F> SliceView<'a, F>
where
    F: PageFetcher,
    F::Item: Clone,
{
    /// Element `k` of the slice, `None` past its end
    pub fn lookup(&self, k: usize) -> Result<Option<F::Item>> {
        match self.plan.position(k) {
            Some(position) => self.list.lookup(position),
            None => Ok(None),
        }
    }

    /// Check if the slice has no elements
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lookup(0)?.is_none())
    }

    /// Element `k` of the slice
    pub fn get(&self, k: usize) -> Result<F::Item> {
        match self.lookup(k)? {
            Some(item) => Ok(item),
            None => Err(Error::out_of_range(k, self.len()?)),
        }
    }

    /// Iterate the slice, fetching through the parent as needed
    pub fn iter(&self) -> SliceIter<'a, F> {
        SliceIter {
            list: self.list,
            plan: self.plan,
            k: 0,
            done: false,
        }
    }

    /// Collect the whole slice
    pub fn to_vec(&self) -> Result<Vec<F::Item>> {
        self.iter().collect()
    }
}

impl<'a, F> IntoIterator for &SliceView<'a, F>
where
    F: PageFetcher,
    F::Item: Clone,
{
    type Item = Result<F::Item>;
    type IntoIter = SliceIter<'a, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`SliceView`]
pub struct SliceIter<'a, F: PageFetcher> {
    list: &'a LazyPagedList<F>,
    plan: SlicePlan,
    k: usize,
    done: bool,
}

impl<F> Iterator for SliceIter<'_, F>
where
    F: PageFetcher,
    F::Item: Clone,
{
    type Item = Result<F::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(position) = self.plan.position(self.k) else {
            self.done = true;
            return None;
        };
        match self.list.lookup(position) {
            Ok(Some(item)) => {
                self.k += 1;
                Some(Ok(item))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<F> FusedIterator for SliceIter<'_, F>
where
    F: PageFetcher,
    F::Item: Clone,
{
}

// ============================================================================
// Async Slice View
// ============================================================================

/// Boxed stream of slice or list items
pub type ItemStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Read-only window over an [`AsyncLazyPagedList`]
///
/// Holds the parent mutably for its whole life, so the parent cannot be
/// grown from anywhere else while the view exists.
pub struct AsyncSliceView<'a, F: AsyncPageFetcher> {
    list: &'a mut AsyncLazyPagedList<F>,
    plan: SlicePlan,
}

impl<'a, F: AsyncPageFetcher> AsyncSliceView<'a, F> {
    pub(crate) fn new(list: &'a mut AsyncLazyPagedList<F>, plan: SlicePlan) -> Self {
        Self { list, plan }
    }

    /// The resolved plan
    pub fn plan(&self) -> SlicePlan {
        self.plan
    }

    /// Final length of the slice if the parent's length is already known
    pub fn known_len(&self) -> Option<usize> {
        self.list
            .known_len()
            .map(|len| self.plan.count_within(len))
    }

    /// Number of elements in the slice (eager)
    pub async fn len(&mut self) -> Result<usize> {
        if let Some(len) = self.known_len() {
            return Ok(len);
        }
        let parent_len = self.list.len().await?;
        Ok(self.plan.count_within(parent_len))
    }

    /// Element `k` of the slice, `None` past its end
    pub async fn lookup(&mut self, k: usize) -> Result<Option<&F::Item>> {
        match self.plan.position(k) {
            Some(position) => self.list.lookup(position).await,
            None => Ok(None),
        }
    }

    /// Element `k` of the slice
    pub async fn get(&mut self, k: usize) -> Result<&F::Item> {
        if let Some(position) = self.plan.position(k) {
            self.list.ensure(position).await?;
            if position < self.list.buffered() {
                return Ok(&self.list.buffer()[position]);
            }
        }
        let len = self.len().await?;
        Err(Error::out_of_range(k, len))
    }

    /// Narrow this view further; positions are relative to the view
    pub fn slice(self, range: impl Into<SliceRange>) -> Result<AsyncSliceView<'a, F>> {
        let bounded = self.list.limit().is_some();
        let plan = self.plan.compose(range.into(), self.known_len(), bounded)?;
        Ok(AsyncSliceView::new(self.list, plan))
    }
}

impl<'a, F> AsyncSliceView<'a, F>
where
    F: AsyncPageFetcher,
    F::Item: Clone,
{
    /// Stream the slice, fetching through the parent as needed
    pub fn stream(&mut self) -> ItemStream<'_, F::Item> {
        let plan = self.plan;
        Box::pin(stream::try_unfold(
            (&mut *self.list, 0usize),
            move |(list, k)| async move {
                let Some(position) = plan.position(k) else {
                    return Ok::<_, Error>(None);
                };
                let item = list.lookup(position).await?.cloned();
                Ok::<_, Error>(item.map(|item| (item, (list, k + 1))))
            },
        ))
    }

    /// Collect the whole slice
    pub async fn collect(&mut self) -> Result<Vec<F::Item>> {
        let mut items = Vec::new();
        let mut k = 0;
        while let Some(item) = self.lookup(k).await? {
            items.push(item.clone());
            k += 1;
        }
        Ok(items)
    }
}
