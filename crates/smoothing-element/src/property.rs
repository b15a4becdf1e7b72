use smoothing_core::config::{
    DEFAULT_KERNEL_SIZE, DEFAULT_SIGMA, MAX_KERNEL_SIZE, MAX_SIGMA, MIN_KERNEL_SIZE, MIN_SIGMA,
};

use crate::error::ElementError;

/// Identifier of a tunable element property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    /// The size index `n` of the kernel.
    KernelSize,
    /// The Gaussian sigma.
    Sigma,
}

impl PropertyId {
    /// All the properties of the element.
    pub const ALL: [PropertyId; 2] = [PropertyId::KernelSize, PropertyId::Sigma];

    /// The property name as exposed to the host.
    pub fn name(&self) -> &'static str {
        match self {
            PropertyId::KernelSize => "kernelsize",
            PropertyId::Sigma => "sigma",
        }
    }

    /// A short human readable description.
    pub fn blurb(&self) -> &'static str {
        match self {
            PropertyId::KernelSize => {
                "The size index (n) of the kernel, kernel will be square 2n+1 in size."
            }
            PropertyId::Sigma => {
                "The sigma used for Gaussian kernel, e^(-r^2/sigma^2) where r is distance from central pixel."
            }
        }
    }

    /// The default value of the property.
    pub fn default_value(&self) -> Property {
        match self {
            PropertyId::KernelSize => Property::KernelSize(DEFAULT_KERNEL_SIZE as i64),
            PropertyId::Sigma => Property::Sigma(DEFAULT_SIGMA),
        }
    }

    /// Look a property up by name.
    pub fn from_name(name: &str) -> Result<Self, ElementError> {
        PropertyId::ALL
            .into_iter()
            .find(|id| id.name() == name)
            .ok_or_else(|| ElementError::UnknownProperty(name.to_string()))
    }
}

/// A property value as set or read by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Property {
    /// Kernel size index, valid in `[0, 2]`.
    KernelSize(i64),
    /// Gaussian sigma, valid in `[0.1, 100]`.
    Sigma(f32),
}

impl Property {
    /// The identifier of the property.
    pub fn id(&self) -> PropertyId {
        match self {
            Property::KernelSize(_) => PropertyId::KernelSize,
            Property::Sigma(_) => PropertyId::Sigma,
        }
    }

    /// Parse a property from its name and textual value.
    ///
    /// # Examples
    ///
    /// ```
    /// use smoothing_element::Property;
    ///
    /// let prop = Property::from_name_value("sigma", "2.5").unwrap();
    /// assert_eq!(prop, Property::Sigma(2.5));
    /// ```
    pub fn from_name_value(name: &str, value: &str) -> Result<Self, ElementError> {
        let id = PropertyId::from_name(name)?;
        let invalid = || ElementError::InvalidPropertyValue {
            name: id.name(),
            value: value.to_string(),
        };

        match id {
            PropertyId::KernelSize => value
                .trim()
                .parse::<i64>()
                .map(Property::KernelSize)
                .map_err(|_| invalid()),
            PropertyId::Sigma => value
                .trim()
                .parse::<f32>()
                .map(Property::Sigma)
                .map_err(|_| invalid()),
        }
    }

    /// Check the value against the property range.
    pub fn validate(&self) -> Result<(), ElementError> {
        let valid = match *self {
            Property::KernelSize(v) => {
                (MIN_KERNEL_SIZE as i64..=MAX_KERNEL_SIZE as i64).contains(&v)
            }
            Property::Sigma(v) => (MIN_SIGMA..=MAX_SIGMA).contains(&v),
        };

        if valid {
            Ok(())
        } else {
            Err(ElementError::InvalidPropertyValue {
                name: self.id().name(),
                value: self.to_string(),
            })
        }
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Property::KernelSize(v) => write!(f, "{v}"),
            Property::Sigma(v) => write!(f, "{v}"),
        }
    }
}
