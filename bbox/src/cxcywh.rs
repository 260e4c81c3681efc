use super::{Rect, LTRB};
use crate::{common::*, Transform};

/// Bounding box in CxCyWH format, a.k.a. center format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CxCyWH<T> {
    pub(crate) cx: T,
    pub(crate) cy: T,
    pub(crate) w: T,
    pub(crate) h: T,
}

impl<T> CxCyWH<T> {
    pub fn try_cast<V>(self) -> Option<CxCyWH<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(CxCyWH {
            cx: V::from(self.cx)?,
            cy: V::from(self.cy)?,
            w: V::from(self.w)?,
            h: V::from(self.h)?,
        })
    }

    pub fn cast<V>(self) -> CxCyWH<V>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> CxCyWH<T>
where
    T: Copy + Num,
{
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        CxCyWH {
            cx: self.cx * transform.sx + transform.tx,
            cy: self.cy * transform.sy + transform.ty,
            w: self.w * transform.sx,
            h: self.h * transform.sy,
        }
    }
}

impl<T> Rect for CxCyWH<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn l(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cx - self.w / two
    }

    fn t(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cy - self.h / two
    }

    fn r(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cx + self.w / two
    }

    fn b(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cy + self.h / two
    }

    fn cx(&self) -> Self::Type {
        self.cx
    }

    fn cy(&self) -> Self::Type {
        self.cy
    }

    fn w(&self) -> Self::Type {
        self.w
    }

    fn h(&self) -> Self::Type {
        self.h
    }

    fn try_from_ltrb(ltrb: [T; 4]) -> Result<Self> {
        let [l, t, r, b] = ltrb;
        let zero = T::zero();
        let two = T::one() + T::one();
        let w = r - l;
        let h = b - t;
        ensure!(
            w >= zero && h >= zero,
            "box width and height must be non-negative"
        );

        let cx = l + w / two;
        let cy = t + h / two;

        Ok(Self { cx, cy, w, h })
    }

    fn try_from_ltwh(ltwh: [T; 4]) -> Result<Self> {
        let [l, t, w, h] = ltwh;
        let zero = T::zero();
        let two = T::one() + T::one();
        ensure!(
            w >= zero && h >= zero,
            "box width and height must be non-negative"
        );

        let cx = l + w / two;
        let cy = t + h / two;

        Ok(Self { cx, cy, w, h })
    }

    fn try_from_cxcywh(cxcywh: [T; 4]) -> Result<Self> {
        let [cx, cy, w, h] = cxcywh;
        let zero = T::zero();
        ensure!(
            w >= zero && h >= zero,
            "box width and height must be non-negative"
        );

        Ok(Self { cx, cy, w, h })
    }
}

impl<T> From<LTRB<T>> for CxCyWH<T>
where
    T: Copy + Num,
{
    fn from(from: LTRB<T>) -> Self {
        Self::from(&from)
    }
}

impl<T> From<&LTRB<T>> for CxCyWH<T>
where
    T: Copy + Num,
{
    fn from(from: &LTRB<T>) -> Self {
        let two = T::one() + T::one();
        let LTRB { l, t, r, b, .. } = *from;
        let w = r - l;
        let h = b - t;
        let cx = l + w / two;
        let cy = t + h / two;
        Self { cx, cy, w, h }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn corner_center_round_trip() {
        let corner = LTRB::from_ltrb([10.0, 20.0, 30.0, 60.0]);
        let center: CxCyWH<f64> = (&corner).into();
        assert_abs_diff_eq!(center.cx(), 20.0);
        assert_abs_diff_eq!(center.cy(), 40.0);
        assert_abs_diff_eq!(center.w(), 20.0);
        assert_abs_diff_eq!(center.h(), 40.0);

        let back: LTRB<f64> = (&center).into();
        assert_eq!(back, corner);
    }
}
