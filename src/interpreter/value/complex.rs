use std::{fmt, ops, str::FromStr};

use crate::{error::ConversionError, util::num::format_real};

/// A `complejo` value, displayed as `a+bi` or `a-bi`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComplexNumber {
    /// Real part.
    pub real:      f64,
    /// Imaginary part.
    pub imaginary: f64,
}

impl fmt::Display for ComplexNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.imaginary.is_sign_negative() { '-' } else { '+' };
        write!(f,
               "{}{sign}{}i",
               format_real(self.real),
               format_real(self.imaginary.abs()))
    }
}

impl FromStr for ComplexNumber {
    type Err = ConversionError;

    /// Parses the `a+bi` / `a-bi` text form. A lone real or a lone imaginary
    /// part (`3`, `2i`, `-i`) is accepted too.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fail = || ConversionError::new(text, "complejo", "use la forma a+bi");
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(fail());
        }

        let Some(body) = compact.strip_suffix('i') else {
            return compact.parse::<f64>()
                          .map(|real| Self::new(real, 0.0))
                          .map_err(|_| fail());
        };

        // The split point is the last sign that is not a leading sign or an
        // exponent sign.
        let bytes = body.as_bytes();
        let split = (1..bytes.len()).rev().find(|&i| {
                                               matches!(bytes[i], b'+' | b'-')
                                               && !matches!(bytes[i - 1], b'e' | b'E')
                                           });

        let (real, imaginary) = match split {
            Some(i) => (&body[..i], &body[i..]),
            None => ("0", body),
        };
        let imaginary = match imaginary {
            "" | "+" => "1",
            "-" => "-1",
            other => other,
        };

        let real = real.parse::<f64>().map_err(|_| fail())?;
        let imaginary = imaginary.parse::<f64>().map_err(|_| fail())?;
        Ok(Self::new(real, imaginary))
    }
}

impl ComplexNumber {
    /// The value `real + imaginary·i`.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::complex::ComplexNumber;
    ///
    /// let z = ComplexNumber::new(2.0, -0.5);
    /// assert_eq!(z.to_string(), "2-0.5i");
    /// assert_eq!("2-0.5i".parse::<ComplexNumber>().unwrap(), z);
    /// assert_eq!("-i".parse::<ComplexNumber>().unwrap(), ComplexNumber::new(0.0, -1.0));
    /// ```
    #[must_use]
    pub const fn new(real: f64, imaginary: f64) -> Self {
        Self { real, imaginary }
    }

    /// Distance from the origin, `|z|`.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::complex::ComplexNumber;
    ///
    /// assert_eq!(ComplexNumber::new(-6.0, 8.0).modulus(), 10.0);
    /// ```
    #[must_use]
    pub fn modulus(&self) -> f64 {
        self.real.hypot(self.imaginary)
    }

    /// Both parts are finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.real.is_finite() && self.imaginary.is_finite()
    }

    /// The square root with a non-negative real part. The imaginary part
    /// takes the sign of `self.imaginary`.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::complex::ComplexNumber;
    ///
    /// let root = ComplexNumber::new(0.0, 2.0).principal_root();
    /// assert!((root.real - 1.0).abs() < 1e-12);
    /// assert!((root.imaginary - 1.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn principal_root(self) -> Self {
        let modulus = self.modulus();
        Self::new(((modulus + self.real) / 2.0).sqrt(),
                  ((modulus - self.real) / 2.0).sqrt().copysign(self.imaginary))
    }

    /// `self / divisor`, or `None` when the divisor is zero.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::complex::ComplexNumber;
    ///
    /// let z = ComplexNumber::new(1.0, 1.0);
    /// assert_eq!(z.checked_div(ComplexNumber::new(0.0, 1.0)), Some(ComplexNumber::new(1.0, -1.0)));
    /// assert_eq!(z.checked_div(ComplexNumber::default()), None);
    /// ```
    #[must_use]
    pub fn checked_div(self, divisor: Self) -> Option<Self> {
        let norm = divisor.real.mul_add(divisor.real, divisor.imaginary * divisor.imaginary);
        if norm == 0.0 {
            return None;
        }
        let product = self * divisor.conjugate();
        Some(Self::new(product.real / norm, product.imaginary / norm))
    }

    /// `real - imaginary·i`.
    #[must_use]
    pub fn conjugate(self) -> Self {
        Self::new(self.real, -self.imaginary)
    }
}

impl From<f64> for ComplexNumber {
    fn from(real: f64) -> Self {
        Self::new(real, 0.0)
    }
}

impl ops::Neg for ComplexNumber {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.real, -self.imaginary)
    }
}

/// Component-wise operators.
macro_rules! componentwise {
    ($($trait:ident :: $method:ident => $op:tt),* $(,)?) => {
        $(
            impl ops::$trait for ComplexNumber {
                type Output = Self;

                fn $method(self, rhs: Self) -> Self {
                    Self::new(self.real $op rhs.real, self.imaginary $op rhs.imaginary)
                }
            }
        )*
    };
}

componentwise! {
    Add::add => +,
    Sub::sub => -,
}

impl ops::Mul for ComplexNumber {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.real.mul_add(rhs.real, -(self.imaginary * rhs.imaginary)),
                  self.real.mul_add(rhs.imaginary, self.imaginary * rhs.real))
    }
}
