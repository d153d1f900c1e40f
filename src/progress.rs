//! Progress reporting for the deformation pipeline.
//!
//! [`SpinTransform::update_deformation_with_progress`](crate::deform::SpinTransform::update_deformation_with_progress)
//! reports four stages: assembling the spin energy, the inverse power
//! iterations, assembling the Poisson problem, and solving it. The
//! eigensolver runs inside stage 1 and forwards each iteration through
//! [`Progress::report_sub`], so a caller sees a single stream of updates.
//!
//! # Example
//!
//! ```
//! use spinxform::progress::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//!
//! progress.report(1, 4, "Solving eigenvalue problem");
//! ```

/// Callback receiving `(current, total, message)` as a deformation runs.
///
/// `current` counts completed steps out of `total`. Sub-stage updates arrive
/// in thousandths (see [`report_sub`](Self::report_sub)), so only the ratio
/// is meaningful.
///
/// The callback may borrow from its environment. The eigensolver's reporter
/// borrows the pipeline's reporter and maps its iterations into stage 1.
pub struct Progress<'a> {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync + 'a>,
}

impl<'a> Progress<'a> {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'a,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report `sub_current / sub_total` of stage `range_current` out of
    /// `range_total`, as `range_current + fraction` in thousandths.
    ///
    /// Calls with a zero total are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// # use spinxform::progress::Progress;
    /// # let progress = Progress::none();
    /// // Top level has 4 steps. Step 1 is the eigensolve, which itself runs
    /// // several inverse power iterations. Report sub-progress within step 1:
    /// progress.report_sub(2, 3, 1, 4, "Solving eigenvalue problem");
    /// ```
    #[inline]
    pub fn report_sub(
        &self,
        sub_current: usize,
        sub_total: usize,
        range_current: usize,
        range_total: usize,
        message: &str,
    ) {
        if sub_total == 0 || range_total == 0 {
            return;
        }
        // Fixed-point with three decimal digits
        let sub_fraction = (sub_current * 1000) / sub_total;
        let effective = range_current * 1000 + sub_fraction;
        let total_scaled = range_total * 1000;
        (self.callback)(effective, total_scaled, message);
    }

    /// Reporter that discards every update, used by `update_deformation`.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
