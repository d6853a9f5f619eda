// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::hash::{Hash, Hasher};
use core::mem::MaybeUninit;
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr;
use core::slice::{self, SliceIndex};

use crate::error::{AllocError, CapacityError};
use crate::storage::Storage;

/// Guard size used by [`OVec::with_max_size_or_null`], in elements.
pub const DEFAULT_GUARD_ELEMENTS: usize = 1;

/// Overcommit vector: a dynamic array whose storage is reserved up front.
///
/// An `OVec` reserves address space for `max_size` elements at creation and
/// never reallocates. The OS backs pages lazily, so unused capacity costs no
/// physical memory. Element addresses are stable for the lifetime of the
/// container. A no-access guard region follows the last slot, so a write one
/// element past `max_size` faults.
///
/// An `OVec` is **unbacked** (no storage, `as_ptr()` is null, `max_size()` is
/// 0) when:
/// - it was created with [`OVec::new`] / [`Default`],
/// - the reservation in [`OVec::with_max_size_or_null`] failed,
/// - it was moved out of with [`core::mem::take`].
///
/// Inserting into an unbacked or full `OVec` panics through the safe API.
/// The `*_unchecked` methods skip the check.
///
/// # Example
///
/// ```rust
/// use ovec::OVec;
///
/// let mut v = OVec::<u32>::with_max_size_or_null(1 << 20);
/// assert!(v.is_backed());
///
/// let first: *const u32 = v.push(1);
/// for i in 2..=1000 {
///     v.push(i);
/// }
///
/// // No reallocation ever happens: the first element did not move.
/// assert_eq!(first, &v[0] as *const u32);
/// assert_eq!(v.len(), 1000);
/// assert_eq!(v.max_size(), 1 << 20);
/// ```
pub struct OVec<T> {
    storage: Storage<T>,
}

// Safety: OVec<T> owns its elements exclusively, like Vec<T>.
unsafe impl<T: Send> Send for OVec<T> {}
unsafe impl<T: Sync> Sync for OVec<T> {}

#[cold]
#[inline(never)]
#[track_caller]
fn no_room(op: &str, len: usize, max_size: usize) -> ! {
    panic!("{op}: OVec has no free slot (len {len}, max_size {max_size})");
}

#[cold]
#[inline(never)]
#[track_caller]
fn empty(op: &str) -> ! {
    panic!("{op}: OVec is empty");
}

impl<T> OVec<T> {
    /// Creates an unbacked `OVec`. Nothing can be inserted into it.
    ///
    /// Use the `with_max_size*` factories to get storage; `new` never
    /// allocates.
    pub const fn new() -> Self {
        Self {
            storage: Storage::unbacked(),
        }
    }

    /// Creates an `OVec` with room for `max_size` elements.
    ///
    /// Returns an unbacked `OVec` if the reservation fails (address space
    /// exhausted, `max_size == 0`, size overflow, zero-sized `T`). Check
    /// [`OVec::is_backed`] before inserting.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ovec::OVec;
    ///
    /// let v = OVec::<f32>::with_max_size_or_null(1234);
    /// assert!(!v.as_ptr().is_null());
    /// assert_eq!(v.max_size(), 1234);
    ///
    /// let huge = OVec::<u8>::with_max_size_or_null(usize::MAX);
    /// assert!(huge.as_ptr().is_null());
    /// assert_eq!(huge.max_size(), 0);
    /// ```
    #[must_use]
    pub fn with_max_size_or_null(max_size: usize) -> Self {
        Self::with_max_size_and_guard_or_null(max_size, DEFAULT_GUARD_ELEMENTS)
    }

    /// Like [`OVec::with_max_size_or_null`] with a guard region of at least
    /// `guard_elements` elements (minimum one). The guard is rounded up to
    /// whole pages either way.
    #[must_use]
    pub fn with_max_size_and_guard_or_null(max_size: usize, guard_elements: usize) -> Self {
        Self {
            storage: Storage::with_max_size(max_size, guard_elements),
        }
    }

    /// Creates an `OVec` with room for `max_size` elements, reporting why the
    /// reservation failed.
    ///
    /// # Errors
    ///
    /// - [`AllocError::Reserve`] for zero size, page rounding overflow, or an
    ///   OS refusal.
    /// - [`AllocError::CapacityOverflow`] if `max_size * size_of::<T>()`
    ///   overflows.
    /// - [`AllocError::UnsupportedAlignment`] if `T` needs more than page
    ///   alignment.
    pub fn try_with_max_size(max_size: usize) -> Result<Self, AllocError> {
        Self::try_with_max_size_and_guard(max_size, DEFAULT_GUARD_ELEMENTS)
    }

    /// Fallible counterpart of [`OVec::with_max_size_and_guard_or_null`].
    pub fn try_with_max_size_and_guard(
        max_size: usize,
        guard_elements: usize,
    ) -> Result<Self, AllocError> {
        Ok(Self {
            storage: Storage::try_with_max_size(max_size, guard_elements)?,
        })
    }

    /// Returns `true` if this `OVec` owns a reservation.
    #[inline]
    pub fn is_backed(&self) -> bool {
        self.storage.is_backed()
    }

    /// Pointer to the first slot, or null if unbacked.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.ptr()
    }

    /// Mutable pointer to the first slot, or null if unbacked.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.ptr()
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Number of elements the reservation holds, `0` if unbacked.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.storage.max_size()
    }

    /// Returns `true` if the `OVec` holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free slots left.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.max_size() - self.len()
    }

    /// Returns `true` if no more elements fit. Unbacked `OVec`s are full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.max_size()
    }

    /// The elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        if !self.is_backed() {
            return &[];
        }

        unsafe { slice::from_raw_parts(self.storage.ptr(), self.len()) }
    }

    /// The elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if !self.is_backed() {
            return &mut [];
        }

        unsafe { slice::from_raw_parts_mut(self.storage.ptr(), self.len()) }
    }

    /// The free slots `[len, max_size)`.
    ///
    /// Write elements here, then publish them with
    /// [`OVec::uninitialized_grow_back_by`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use ovec::OVec;
    ///
    /// let mut v = OVec::<u64>::with_max_size_or_null(8);
    ///
    /// for (i, slot) in v.spare_capacity_mut()[..3].iter_mut().enumerate() {
    ///     slot.write(i as u64 * 10);
    /// }
    /// unsafe { v.uninitialized_grow_back_by(3) };
    ///
    /// assert_eq!(v, [0, 10, 20]);
    /// ```
    #[inline]
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        if !self.is_backed() {
            return &mut [];
        }

        unsafe {
            slice::from_raw_parts_mut(
                self.storage.ptr().add(self.len()).cast::<MaybeUninit<T>>(),
                self.remaining(),
            )
        }
    }

    /// First element.
    ///
    /// # Panics
    /// If the `OVec` is empty.
    #[inline]
    #[track_caller]
    pub fn front(&self) -> &T {
        match self.as_slice().first() {
            Some(first) => first,
            None => empty("front"),
        }
    }

    /// First element, mutably.
    ///
    /// # Panics
    /// If the `OVec` is empty.
    #[inline]
    #[track_caller]
    pub fn front_mut(&mut self) -> &mut T {
        match self.as_mut_slice().first_mut() {
            Some(first) => first,
            None => empty("front_mut"),
        }
    }

    /// Last element.
    ///
    /// # Panics
    /// If the `OVec` is empty.
    #[inline]
    #[track_caller]
    pub fn back(&self) -> &T {
        match self.as_slice().last() {
            Some(last) => last,
            None => empty("back"),
        }
    }

    /// Last element, mutably.
    ///
    /// # Panics
    /// If the `OVec` is empty.
    #[inline]
    #[track_caller]
    pub fn back_mut(&mut self) -> &mut T {
        match self.as_mut_slice().last_mut() {
            Some(last) => last,
            None => empty("back_mut"),
        }
    }

    #[inline(always)]
    #[track_caller]
    fn assert_room(&self, op: &str) {
        if self.is_full() {
            no_room(op, self.len(), self.max_size());
        }
    }

    /// Constructs a new element at the back from `f` and returns it.
    ///
    /// `f` runs before the length changes: if it panics, the `OVec` is left
    /// exactly as it was.
    ///
    /// # Panics
    /// If the `OVec` is full or unbacked, or if `f` panics.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ovec::OVec;
    ///
    /// let mut v = OVec::<String>::with_max_size_or_null(2);
    /// v.emplace_back(|| "foo".to_owned());
    ///
    /// let barbar = "barbar";
    /// v.emplace_back(|| barbar[3..].to_owned());
    ///
    /// assert_eq!(v, ["foo", "bar"]);
    /// ```
    #[inline]
    #[track_caller]
    pub fn emplace_back<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.assert_room("emplace_back");

        unsafe { self.emplace_back_unchecked(f) }
    }

    /// Constructs a new element at the back from `f`, unless `f` fails.
    ///
    /// On `Err` the `OVec` is left exactly as it was.
    ///
    /// # Panics
    /// If the `OVec` is full or unbacked.
    #[inline]
    #[track_caller]
    pub fn try_emplace_back<F, E>(&mut self, f: F) -> Result<&mut T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.assert_room("try_emplace_back");

        let value = f()?;

        Ok(unsafe { self.write_back(value) })
    }

    /// Constructs a new element at the back without checking for room.
    ///
    /// # Safety
    /// The `OVec` must be backed and `len() < max_size()`. Writing one slot
    /// past `max_size()` hits the guard region and kills the process; further
    /// out is undefined behavior.
    #[inline]
    pub unsafe fn emplace_back_unchecked<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        debug_assert!(self.is_backed(), "emplace_back_unchecked on unbacked OVec");
        debug_assert!(!self.is_full(), "emplace_back_unchecked on full OVec");

        // Construct first, publish second.
        let value = f();

        unsafe { self.write_back(value) }
    }

    /// # Safety
    /// A free slot must exist at `len()`.
    #[inline(always)]
    unsafe fn write_back(&mut self, value: T) -> &mut T {
        unsafe {
            let slot = self.storage.ptr().add(self.len());
            slot.write(value);
            self.uninitialized_grow_back_by(1);

            &mut *slot
        }
    }

    /// Appends `value` and returns a reference to it.
    ///
    /// # Panics
    /// If the `OVec` is full or unbacked.
    #[inline]
    #[track_caller]
    pub fn push(&mut self, value: T) -> &mut T {
        self.assert_room("push");

        unsafe { self.write_back(value) }
    }

    /// Appends `value`, or hands it back if there is no free slot.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ovec::OVec;
    ///
    /// let mut v = OVec::<u8>::with_max_size_or_null(1);
    /// assert!(v.try_push(1).is_ok());
    ///
    /// let err = v.try_push(2).unwrap_err();
    /// assert_eq!(err.into_element(), 2);
    /// ```
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<&mut T, CapacityError<T>> {
        if self.is_full() {
            return Err(CapacityError::new(value));
        }

        Ok(unsafe { self.write_back(value) })
    }

    /// Appends `value` without checking for room.
    ///
    /// # Safety
    /// Same contract as [`OVec::emplace_back_unchecked`].
    #[inline]
    pub unsafe fn push_unchecked(&mut self, value: T) -> &mut T {
        debug_assert!(!self.is_full(), "push_unchecked on full or unbacked OVec");

        unsafe { self.write_back(value) }
    }

    /// Drops the last element in place.
    ///
    /// # Panics
    /// If the `OVec` is empty.
    #[inline]
    #[track_caller]
    pub fn pop_back(&mut self) {
        if self.is_empty() {
            empty("pop_back");
        }

        unsafe { ptr::drop_in_place(self.uninitialized_shrink_back_by(1)) };
    }

    /// Removes the last element and returns it, or `None` if empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        Some(unsafe { self.uninitialized_shrink_back_by(1).read() })
    }

    /// Drops every element from index `new_len` on. No-op if
    /// `new_len >= len()`.
    pub fn truncate(&mut self, new_len: usize) {
        let len = self.len();

        if new_len >= len {
            return;
        }

        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.storage.ptr().add(new_len), len - new_len);

            // Shrink first: a panicking Drop must not lead to a double drop.
            self.storage.set_len(new_len);
            ptr::drop_in_place(tail);
        }
    }

    /// Drops all elements in index order. Capacity is kept.
    ///
    /// O(1) when `T` has no drop glue, O(n) otherwise.
    #[inline]
    pub fn clear(&mut self) {
        if core::mem::needs_drop::<T>() {
            self.truncate(0);
        } else {
            unsafe { self.storage.set_len(0) };
        }
    }

    /// Marks `n` more slots as initialized without constructing anything.
    ///
    /// # Safety
    /// - `len() + n <= max_size()`.
    /// - Slots `[len(), len() + n)` must hold initialized values.
    #[inline(always)]
    pub unsafe fn uninitialized_grow_back_by(&mut self, n: usize) {
        debug_assert!(n <= self.remaining(), "grow past max_size");

        unsafe { self.storage.set_len(self.len() + n) };
    }

    /// Forgets the last `n` elements without dropping them and returns a
    /// pointer to the first of them.
    ///
    /// # Safety
    /// `n <= len()`. The caller takes over the released values: drop or read
    /// them, or leak them.
    #[inline(always)]
    pub unsafe fn uninitialized_shrink_back_by(&mut self, n: usize) -> *mut T {
        debug_assert!(n <= self.len(), "shrink below zero");

        unsafe {
            let new_len = self.len() - n;
            self.storage.set_len(new_len);

            self.storage.ptr().add(new_len)
        }
    }

    /// Exchanges the storage of two `OVec`s. No element is moved.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
    }
}

/// Exchanges the storage of two `OVec`s. No element is moved.
///
/// # Example
///
/// ```rust
/// use ovec::OVec;
///
/// let mut a = OVec::<i32>::with_max_size_or_null(123);
/// let mut b = OVec::<i32>::new();
/// a.push(1234);
///
/// ovec::swap(&mut a, &mut b);
///
/// assert_eq!(a.max_size(), 0);
/// assert_eq!(b.max_size(), 123);
/// assert_eq!(b, [1234]);
/// ```
#[inline]
pub fn swap<T>(lhs: &mut OVec<T>, rhs: &mut OVec<T>) {
    lhs.swap(rhs);
}

impl<T> Drop for OVec<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for OVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for OVec<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for OVec<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for OVec<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for OVec<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for OVec<T> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for OVec<T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<'a, T> IntoIterator for &'a OVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut OVec<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

/// Pushes every item.
///
/// # Panics
/// When the `OVec` runs out of room.
impl<T> Extend<T> for OVec<T> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for OVec<T> {
    #[track_caller]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for value in iter {
            self.push(*value);
        }
    }
}

impl<T, U> PartialEq<OVec<U>> for OVec<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &OVec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for OVec<T> {}

impl<T, U> PartialEq<[U]> for OVec<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<&[U]> for OVec<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for OVec<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Hash> Hash for OVec<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for OVec<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OVec")
            .field("elements", &self.as_slice())
            .field("max_size", &self.max_size())
            .finish()
    }
}
