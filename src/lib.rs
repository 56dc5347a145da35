pub mod configuration;

pub mod error {
    pub mod griderror;
    pub mod configurationerror;
}

pub mod math {
    pub mod clamp;
    pub mod interpolation;

    pub mod function {
        pub mod evaluatablefunction;
        pub mod analyticfunction;
        pub mod tabularfunction;
        pub mod sumfunction;
    }
}

pub mod grid {
    pub mod grid;
    pub mod gridgenerator;
    pub mod uniongridbuilder;
    pub mod resampler;
    pub mod aggregator;
}

pub mod search {
    pub mod gridsearcher;
    pub mod hashbasedgridsearcher;
}

pub mod table {
    pub mod generationunit;
    pub mod generatedtable;
    pub mod tablegenerator;
}
