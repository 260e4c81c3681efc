use super::{CxCyWH, Rect, RectNum, Size, LTRB};
use crate::common::*;

/// Axis-aligned scaling plus translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    pub sx: T,
    pub sy: T,
    pub tx: T,
    pub ty: T,
}

impl<T> Transform<T>
where
    T: Copy + Num + PartialOrd,
{
    /// The transform that maps the `src` rectangle onto the `tgt` rectangle.
    pub fn from_rects<R>(src: &R, tgt: &R) -> Self
    where
        R: Rect<Type = T>,
    {
        let sx = tgt.w() / src.w();
        let sy = tgt.h() / src.h();
        let tx = tgt.l() - src.l() * sx;
        let ty = tgt.t() - src.t() * sy;

        Self { sx, sy, tx, ty }
    }

    pub fn from_sizes_exact(src_size: &Size<T>, tgt_size: &Size<T>) -> Self {
        let zero = T::zero();
        let src = LTRB::from_ltwh([zero, zero, src_size.w(), src_size.h()]);
        let tgt = LTRB::from_ltwh([zero, zero, tgt_size.w(), tgt_size.h()]);
        Self::from_rects(&src, &tgt)
    }

    /// The aspect-preserving transform that centers `src_size` within
    /// `tgt_size`.
    pub fn from_sizes_letterbox(src_size: &Size<T>, tgt_size: &Size<T>) -> Self {
        let (new_h, new_w) = if tgt_size.h() * src_size.w() <= tgt_size.w() * src_size.h() {
            let new_h = tgt_size.h();
            let new_w = src_size.w() * tgt_size.h() / src_size.h();
            (new_h, new_w)
        } else {
            let new_h = src_size.h() * tgt_size.w() / src_size.w();
            let new_w = tgt_size.w();
            (new_h, new_w)
        };

        let zero = T::zero();
        let two = T::one() + T::one();
        let off_x = (tgt_size.w() - new_w) / two;
        let off_y = (tgt_size.h() - new_h) / two;

        let src = LTRB::from_ltwh([zero, zero, src_size.w(), src_size.h()]);
        let tgt = LTRB::from_ltwh([off_x, off_y, new_w, new_h]);

        Self::from_rects(&src, &tgt)
    }
}

impl<T> Transform<T>
where
    T: Copy + Num + Neg<Output = T>,
{
    pub fn inverse(&self) -> Self {
        let sx = T::one() / self.sx;
        let sy = T::one() / self.sy;
        let tx = -self.tx / self.sx;
        let ty = -self.ty / self.sy;

        Self { sx, sy, tx, ty }
    }
}

impl<T> Transform<T> {
    pub fn try_cast<V>(self) -> Option<Transform<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(Transform {
            sx: V::from(self.sx)?,
            sy: V::from(self.sy)?,
            tx: V::from(self.tx)?,
            ty: V::from(self.ty)?,
        })
    }

    pub fn cast<V>(self) -> Transform<V>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> Mul<&LTRB<T>> for &Transform<T>
where
    T: Copy + Num,
{
    type Output = LTRB<T>;

    fn mul(self, rhs: &LTRB<T>) -> Self::Output {
        rhs.transform(self)
    }
}

impl<T> Mul<&CxCyWH<T>> for &Transform<T>
where
    T: Copy + Num,
{
    type Output = CxCyWH<T>;

    fn mul(self, rhs: &CxCyWH<T>) -> Self::Output {
        rhs.transform(self)
    }
}

impl<T> Mul<&Transform<T>> for &Transform<T>
where
    T: Copy + Num,
{
    type Output = Transform<T>;

    fn mul(self, rhs: &Transform<T>) -> Self::Output {
        Transform {
            sx: self.sx * rhs.sx,
            sy: self.sy * rhs.sy,
            tx: rhs.tx * self.sx + self.tx,
            ty: rhs.ty * self.sy + self.ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn transform_inverse() {
        let orig = Transform {
            sx: 2.0,
            sy: 2.0,
            tx: 1.0,
            ty: 1.0,
        };
        assert_eq!(orig.inverse().inverse(), orig);
    }

    #[test]
    fn resize_exact() {
        let transform = Transform::from_sizes_exact(
            &Size::from_hw([80.0, 80.0]),
            &Size::from_hw([20.0, 40.0]),
        );
        let expect = Transform {
            sx: 0.5,
            sy: 0.25,
            tx: 0.0,
            ty: 0.0,
        };
        assert_eq!(transform, expect);
    }

    #[test]
    fn resize_letterbox() {
        let transform = Transform::from_sizes_letterbox(
            &Size::from_hw([80.0, 80.0]),
            &Size::from_hw([20.0, 40.0]),
        );
        let expect = Transform {
            sx: 0.25,
            sy: 0.25,
            tx: 10.0,
            ty: 0.0,
        };
        assert_eq!(transform, expect);

        // boxes follow the image into the padded frame
        let rect = LTRB::from_ltrb([0.0, 0.0, 80.0, 80.0]);
        let mapped = &transform * &rect;
        assert_eq!(mapped.ltrb(), [10.0, 0.0, 30.0, 20.0]);
    }
}
