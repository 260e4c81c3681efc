use super::{CxCyWH, Rect};
use crate::{common::*, Transform};

/// Bounding box in LTRB format, a.k.a. corner format `(x1, y1, x2, y2)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LTRB<T> {
    pub(crate) l: T,
    pub(crate) t: T,
    pub(crate) r: T,
    pub(crate) b: T,
}

impl<T> LTRB<T> {
    pub fn try_cast<V>(self) -> Option<LTRB<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(LTRB {
            l: V::from(self.l)?,
            t: V::from(self.t)?,
            r: V::from(self.r)?,
            b: V::from(self.b)?,
        })
    }

    pub fn cast<V>(self) -> LTRB<V>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> LTRB<T>
where
    T: Copy + Num,
{
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        LTRB {
            l: self.l * transform.sx + transform.tx,
            t: self.t * transform.sy + transform.ty,
            r: self.r * transform.sx + transform.tx,
            b: self.b * transform.sy + transform.ty,
        }
    }
}

impl<T> Rect for LTRB<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn l(&self) -> Self::Type {
        self.l
    }

    fn t(&self) -> Self::Type {
        self.t
    }

    fn r(&self) -> Self::Type {
        self.r
    }

    fn b(&self) -> Self::Type {
        self.b
    }

    fn cx(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.l + self.w() / two
    }

    fn cy(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.t + self.h() / two
    }

    fn w(&self) -> Self::Type {
        self.r - self.l
    }

    fn h(&self) -> Self::Type {
        self.b - self.t
    }

    fn try_from_ltrb(ltrb: [Self::Type; 4]) -> Result<Self> {
        let [l, t, r, b] = ltrb;
        ensure!(r >= l && b >= t, "r >= l and b >= t must hold");

        Ok(Self { l, t, r, b })
    }

    fn try_from_ltwh(ltwh: [Self::Type; 4]) -> Result<Self> {
        let [l, t, w, h] = ltwh;
        let r = l + w;
        let b = t + h;
        Self::try_from_ltrb([l, t, r, b])
    }

    fn try_from_cxcywh(cxcywh: [Self::Type; 4]) -> Result<Self> {
        let [cx, cy, w, h] = cxcywh;
        let zero = T::zero();
        ensure!(w >= zero && h >= zero, "w and h must be non-negative");

        let two = T::one() + T::one();
        let l = cx - w / two;
        let r = cx + w / two;
        let t = cy - h / two;
        let b = cy + h / two;

        Ok(Self { l, t, r, b })
    }
}

impl<T> From<CxCyWH<T>> for LTRB<T>
where
    T: Copy + Num,
{
    fn from(from: CxCyWH<T>) -> Self {
        Self::from(&from)
    }
}

impl<T> From<&CxCyWH<T>> for LTRB<T>
where
    T: Copy + Num,
{
    fn from(from: &CxCyWH<T>) -> Self {
        let two = T::one() + T::one();
        let CxCyWH { cx, cy, w, h, .. } = *from;
        let l = cx - w / two;
        let t = cy - h / two;
        let r = cx + w / two;
        let b = cy + h / two;
        Self { l, t, r, b }
    }
}
