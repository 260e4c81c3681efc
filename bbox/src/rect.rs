use super::{CxCyWH, Size, LTRB};
use crate::common::*;

/// The generic rectangle.
pub trait Rect {
    type Type;

    fn l(&self) -> Self::Type;
    fn t(&self) -> Self::Type;
    fn r(&self) -> Self::Type;
    fn b(&self) -> Self::Type;
    fn cx(&self) -> Self::Type;
    fn cy(&self) -> Self::Type;
    fn w(&self) -> Self::Type;
    fn h(&self) -> Self::Type;

    fn try_from_ltrb(ltrb: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;

    fn try_from_ltwh(ltwh: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;

    fn try_from_cxcywh(cxcywh: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;
}

pub trait RectNum: Rect
where
    Self::Type: Num + PartialOrd,
{
    fn from_ltrb(ltrb: [Self::Type; 4]) -> Self
    where
        Self: Sized,
    {
        Self::try_from_ltrb(ltrb).unwrap()
    }

    fn from_ltwh(ltwh: [Self::Type; 4]) -> Self
    where
        Self: Sized,
    {
        Self::try_from_ltwh(ltwh).unwrap()
    }

    fn from_cxcywh(cxcywh: [Self::Type; 4]) -> Self
    where
        Self: Sized,
    {
        Self::try_from_cxcywh(cxcywh).unwrap()
    }

    fn ltrb(&self) -> [Self::Type; 4] {
        [self.l(), self.t(), self.r(), self.b()]
    }

    fn ltwh(&self) -> [Self::Type; 4] {
        [self.l(), self.t(), self.w(), self.h()]
    }

    fn cxcywh(&self) -> [Self::Type; 4] {
        [self.cx(), self.cy(), self.w(), self.h()]
    }

    fn wh(&self) -> [Self::Type; 2] {
        [self.w(), self.h()]
    }

    fn to_ltrb(&self) -> LTRB<Self::Type> {
        LTRB {
            l: self.l(),
            t: self.t(),
            r: self.r(),
            b: self.b(),
        }
    }

    fn to_cxcywh(&self) -> CxCyWH<Self::Type> {
        CxCyWH {
            cx: self.cx(),
            cy: self.cy(),
            w: self.w(),
            h: self.h(),
        }
    }

    fn area(&self) -> Self::Type {
        self.w() * self.h()
    }
}

pub trait RectFloat: RectNum
where
    Self::Type: Float,
{
    fn intersect_with<R>(&self, other: &R) -> Option<LTRB<Self::Type>>
    where
        R: Rect<Type = Self::Type>,
    {
        let l = self.l().max(other.l());
        let t = self.t().max(other.t());
        let r = self.r().min(other.r());
        let b = self.b().min(other.b());
        (r > l && b > t).then(|| LTRB::from_ltrb([l, t, r, b]))
    }

    fn intersection_area_with<R>(&self, other: &R) -> Self::Type
    where
        R: Rect<Type = Self::Type>,
    {
        self.intersect_with(other)
            .map(|rect| rect.area())
            .unwrap_or_else(Self::Type::zero)
    }

    fn iou_with<R>(&self, other: &R, epsilon: Self::Type) -> Self::Type
    where
        R: Rect<Type = Self::Type>,
    {
        let inter_area = self.intersection_area_with(other);
        let union_area = self.area() + other.area() - inter_area + epsilon;
        inter_area / union_area
    }

    /// Crop the box to the frame spanning (0, 0) to (w, h) of `size`.
    fn clamp_to_size(&self, size: &Size<Self::Type>) -> LTRB<Self::Type> {
        let zero = Self::Type::zero();
        let l = self.l().max(zero).min(size.w());
        let t = self.t().max(zero).min(size.h());
        let r = self.r().max(zero).min(size.w());
        let b = self.b().max(zero).min(size.h());
        LTRB { l, t, r, b }
    }
}

impl<T> RectNum for T
where
    T: Rect,
    T::Type: Num + PartialOrd,
{
}

impl<T> RectFloat for T
where
    T: Rect,
    T::Type: Float,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn iou() {
        let lhs = LTRB::from_ltrb([0.0, 0.0, 2.0, 2.0]);
        let rhs = LTRB::from_ltrb([1.0, 1.0, 3.0, 3.0]);
        assert_abs_diff_eq!(lhs.iou_with(&rhs, 0.0), 1.0 / 7.0);
        assert_abs_diff_eq!(lhs.iou_with(&lhs, 0.0), 1.0);

        let disjoint = LTRB::from_ltrb([5.0, 5.0, 6.0, 6.0]);
        assert_abs_diff_eq!(lhs.iou_with(&disjoint, 1e-8), 0.0);
    }

    #[test]
    fn clamp_to_frame() {
        let rect = LTRB::from_ltrb([-5.0, 10.0, 30.0, 50.0]);
        let size = Size::from_hw([40.0, 20.0]);
        let clamped = rect.clamp_to_size(&size);
        assert_eq!(clamped.ltrb(), [0.0, 10.0, 20.0, 40.0]);
    }
}
