use super::{CxCyWH, Rect, Transform, LTRB};
use crate::common::*;

/// A bounding box tagged with a class value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label<R, C>
where
    R: Rect,
{
    pub rect: R,
    pub class: C,
}

impl<'a, T, C> Mul<&'a Label<LTRB<T>, C>> for &'a Transform<T>
where
    T: Copy + Num + PartialOrd,
    C: Copy,
{
    type Output = Label<LTRB<T>, C>;

    fn mul(self, rhs: &'a Label<LTRB<T>, C>) -> Self::Output {
        Label {
            rect: self * &rhs.rect,
            class: rhs.class,
        }
    }
}

impl<'a, T, C> Mul<&'a Label<CxCyWH<T>, C>> for &'a Transform<T>
where
    T: Copy + Num + PartialOrd,
    C: Copy,
{
    type Output = Label<CxCyWH<T>, C>;

    fn mul(self, rhs: &'a Label<CxCyWH<T>, C>) -> Self::Output {
        Label {
            rect: self * &rhs.rect,
            class: rhs.class,
        }
    }
}
