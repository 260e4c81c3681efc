use crate::common::*;

/// Frame size in (height, width) order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Size<T> {
    h: T,
    w: T,
}

impl<T> Size<T> {
    pub fn try_cast<U>(self) -> Option<Size<U>>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        Some(Size {
            h: U::from(self.h)?,
            w: U::from(self.w)?,
        })
    }

    pub fn cast<U>(self) -> Size<U>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> Size<T>
where
    T: Num + PartialOrd + Copy,
{
    pub fn try_from_hw(hw: [T; 2]) -> Result<Self> {
        let [h, w] = hw;
        let zero = T::zero();
        ensure!(
            h >= zero && w >= zero,
            "height and width parameters must be non-negative"
        );
        Ok(Self { h, w })
    }

    pub fn from_hw(hw: [T; 2]) -> Self {
        Self::try_from_hw(hw).unwrap()
    }

    pub fn h(&self) -> T {
        self.h
    }

    pub fn w(&self) -> T {
        self.w
    }

    pub fn hw(&self) -> [T; 2] {
        [self.h, self.w]
    }

    pub fn area(&self) -> T {
        self.h * self.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn size_area() {
        let size = Size::from_hw([3.0, 2.0]);
        let area: f64 = size.area();
        assert_abs_diff_eq!(area, 6.0);
    }

    #[test]
    fn size_cast() {
        let size = Size::from_hw([480usize, 640]);
        let size: Size<f64> = size.cast();
        assert_eq!(size.hw(), [480.0, 640.0]);
    }
}
